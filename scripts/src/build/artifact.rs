use std::{
    collections::HashSet,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use alloy::{hex, primitives::Bytes};
use json::JsonValue;
use tracing::debug;
use walkdir::WalkDir;

use crate::{config::LibraryAddresses, errors::ScriptError};

/// A placeholder left in the bytecode for one library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    /// Source file of the library
    pub source: String,
    /// Name of the library
    pub name: String,
    /// Byte offsets and lengths of each placeholder
    pub offsets: Vec<(usize, usize)>,
}

/// A compiled contract, as written by the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Name of the contract
    pub contract_name: String,
    /// Source file the contract is declared in
    pub source_name: String,
    /// Creation bytecode, hex encoded without prefix, possibly holding library placeholders
    pub bytecode: String,
    /// Library placeholders to patch before deploying
    pub link_references: Vec<LinkReference>,
    /// Fully qualified names of the contracts this one can deploy, zksolc artifacts only
    pub factory_deps: Vec<String>,
}

impl Artifact {
    /// Parse an artifact json document
    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        let parsed =
            json::parse(content).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        let contract_name = required_str(&parsed, "contractName")?;
        let source_name = required_str(&parsed, "sourceName")?;
        let bytecode = required_str(&parsed, "bytecode")?;
        let bytecode = bytecode.strip_prefix("0x").unwrap_or(&bytecode).to_string();

        let mut link_references = Vec::new();
        for (source, libraries) in parsed["linkReferences"].entries() {
            for (name, offsets) in libraries.entries() {
                let offsets = offsets
                    .members()
                    .map(|offset| {
                        match (offset["start"].as_usize(), offset["length"].as_usize()) {
                            (Some(start), Some(length)) => Ok((start, length)),
                            _ => Err(ScriptError::ArtifactParsing(format!(
                                "malformed link reference for {}:{}",
                                source, name
                            ))),
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                link_references.push(LinkReference {
                    source: source.to_string(),
                    name: name.to_string(),
                    offsets,
                });
            }
        }

        // `factoryDeps` maps bytecode hashes to `path/File.sol:Name`
        let factory_deps = parsed["factoryDeps"]
            .entries()
            .map(|(hash, name)| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    ScriptError::ArtifactParsing(format!("malformed factory dependency {}", hash))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Artifact {
            contract_name,
            source_name,
            bytecode,
            link_references,
            factory_deps,
        })
    }

    /// Read and parse an artifact file
    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScriptError::ArtifactNotFound(format!("{}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Replace the library placeholders with the given addresses and decode the bytecode
    pub fn link(&self, libraries: &LibraryAddresses) -> Result<Bytes, ScriptError> {
        // Offsets index hex digits, anything else would break them
        if !self.bytecode.is_ascii() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} bytecode is not hex encoded",
                self.contract_name
            )));
        }
        let mut bytecode = self.bytecode.clone();

        for reference in &self.link_references {
            let address = libraries
                .find(&reference.source, &reference.name)
                .ok_or_else(|| {
                    ScriptError::LibraryLinking(format!(
                        "no address configured for {}:{}",
                        reference.source, reference.name
                    ))
                })?;
            let address = address.trim_start_matches("0x").to_lowercase();

            for &(start, length) in &reference.offsets {
                let range = start
                    .checked_mul(2)
                    .zip(start.checked_add(length).and_then(|end| end.checked_mul(2)));
                match range {
                    Some((from, to)) if to - from == address.len() && to <= bytecode.len() => {
                        bytecode.replace_range(from..to, &address)
                    }
                    _ => {
                        return Err(ScriptError::LibraryLinking(format!(
                            "invalid placeholder at {} for {}:{}",
                            start, reference.source, reference.name
                        )))
                    }
                }
            }
            debug!(library = %reference.name, "Linked library");
        }

        if bytecode.contains("__") {
            return Err(ScriptError::LibraryLinking(format!(
                "{} still holds unlinked placeholders",
                self.contract_name
            )));
        }

        hex::decode(&bytecode)
            .map(Bytes::from)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }
}

/// Read a mandatory string field of an artifact
fn required_str(parsed: &JsonValue, key: &str) -> Result<String, ScriptError> {
    parsed[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ScriptError::ArtifactParsing(format!("missing `{}` field", key)))
}

/// Linked bytecode of a contract, with the bytecodes it needs published alongside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployableContract {
    /// Linked creation bytecode
    pub bytecode: Bytes,
    /// Linked bytecodes of every contract it can deploy, direct or not
    pub factory_deps: Vec<Bytes>,
}

/// Resolve artifacts by name below an artifacts directory, and link them
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// Artifacts directory
    root: PathBuf,
    /// Libraries linked into every bytecode
    libraries: &'static LibraryAddresses,
}

impl ArtifactStore {
    /// Store reading below `root`, linking with `libraries`
    pub fn new(root: impl Into<PathBuf>, libraries: &'static LibraryAddresses) -> Self {
        Self {
            root: root.into(),
            libraries,
        }
    }

    /// Path of the artifact file.
    ///
    /// A fully qualified `path/File.sol:Name` maps directly to `path/File.sol/Name.json`,
    /// a bare name is searched through the whole directory and must be unique.
    /// Symbolic links are not followed.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, ScriptError> {
        if let Some((source, contract)) = name.split_once(':') {
            let path = self.root.join(source).join(format!("{}.json", contract));
            return if path.is_file() {
                Ok(path)
            } else {
                Err(ScriptError::ArtifactNotFound(path.display().to_string()))
            };
        }

        let file_name = format!("{}.json", name);
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| {
                ScriptError::ArtifactNotFound(format!("{}: {}", self.root.display(), e))
            })?;
            if entry.file_type().is_file() && entry.file_name() == OsStr::new(&file_name) {
                found.push(entry.into_path());
            }
        }

        match found.len() {
            0 => Err(ScriptError::ArtifactNotFound(format!(
                "{} in {}",
                name,
                self.root.display()
            ))),
            1 => Ok(found.remove(0)),
            _ => Err(ScriptError::ArtifactNotFound(format!(
                "{} is ambiguous, use a fully qualified name ({} candidates)",
                name,
                found.len()
            ))),
        }
    }

    /// Load an artifact by name
    pub fn load(&self, name: &str) -> Result<Artifact, ScriptError> {
        let artifact = Artifact::read(&self.path_for(name)?)?;
        debug!(
            artifact = name,
            source = %artifact.source_name,
            contract = %artifact.contract_name,
            "Resolved artifact"
        );
        Ok(artifact)
    }

    /// Load an artifact and return its linked creation bytecode
    pub fn linked_bytecode(&self, name: &str) -> Result<Bytes, ScriptError> {
        self.load(name)?.link(self.libraries)
    }

    /// Load an artifact with the linked bytecodes of all its factory dependencies
    pub fn deployable(&self, name: &str) -> Result<DeployableContract, ScriptError> {
        let artifact = self.load(name)?;
        let bytecode = artifact.link(self.libraries)?;

        let mut factory_deps = Vec::new();
        let mut visited =
            HashSet::from([format!("{}:{}", artifact.source_name, artifact.contract_name)]);
        let mut pending = artifact.factory_deps;
        while let Some(dep) = pending.pop() {
            if !visited.insert(dep.clone()) {
                continue;
            }
            let dep_artifact = self.load(&dep)?;
            factory_deps.push(dep_artifact.link(self.libraries)?);
            pending.extend(dep_artifact.factory_deps);
        }

        Ok(DeployableContract {
            bytecode,
            factory_deps,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::{config::Profile, constants::STRING_UTILS_SOURCE};

    /// Placeholder as emitted by solc for a library
    const PLACEHOLDER: &str = "__$0123456789abcdef0123456789abcdef01$__";

    fn linked_artifact_json() -> String {
        format!(
            r#"{{
                "contractName": "EmailAuth",
                "sourceName": "contracts/EmailAuth.sol",
                "bytecode": "0x6001{}6002",
                "linkReferences": {{
                    "{}": {{ "StringUtils": [{{ "start": 2, "length": 20 }}] }}
                }}
            }}"#,
            PLACEHOLDER, STRING_UTILS_SOURCE
        )
    }

    fn write_artifact(root: &Path, source: &str, name: &str, bytecode: &str) {
        write_artifact_with_deps(root, source, name, bytecode, &[]);
    }

    fn write_artifact_with_deps(
        root: &Path,
        source: &str,
        name: &str,
        bytecode: &str,
        deps: &[&str],
    ) {
        let dir = root.join(source);
        fs::create_dir_all(&dir).unwrap();
        let mut factory_deps = JsonValue::new_object();
        for (i, dep) in deps.iter().enumerate() {
            factory_deps[format!("0x{:064x}", i)] = (*dep).into();
        }
        let content = format!(
            r#"{{"contractName": "{}", "sourceName": "{}", "bytecode": "{}", "linkReferences": {{}}, "factoryDeps": {}}}"#,
            name,
            source,
            bytecode,
            factory_deps.dump()
        );
        fs::write(dir.join(format!("{}.json", name)), content).unwrap();
    }

    fn artifact_with_offset(bytecode: &str, start: &str, length: &str) -> Artifact {
        let json = format!(
            r#"{{
                "contractName": "A",
                "sourceName": "a.sol",
                "bytecode": "{}",
                "linkReferences": {{
                    "{}": {{ "StringUtils": [{{ "start": {}, "length": {} }}] }}
                }}
            }}"#,
            bytecode, STRING_UTILS_SOURCE, start, length
        );
        Artifact::parse(&json).unwrap()
    }

    #[test]
    fn test_parse_artifact() {
        let artifact = Artifact::parse(&linked_artifact_json()).unwrap();
        assert_eq!(artifact.contract_name, "EmailAuth");
        assert_eq!(artifact.source_name, "contracts/EmailAuth.sol");
        assert!(!artifact.bytecode.starts_with("0x"));
        assert_eq!(artifact.link_references.len(), 1);
        assert_eq!(artifact.link_references[0].name, "StringUtils");
        assert_eq!(artifact.link_references[0].offsets, vec![(2, 20)]);
    }

    #[test]
    fn test_parse_rejects_missing_bytecode() {
        let err = Artifact::parse(r#"{"contractName": "A", "sourceName": "a.sol"}"#).unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }

    #[test]
    fn test_link_libraries() {
        let artifact = Artifact::parse(&linked_artifact_json()).unwrap();
        let bytecode = artifact.link(Profile::Testnet.libraries()).unwrap();

        assert_eq!(bytecode.len(), 24);
        assert_eq!(&bytecode[..2], &[0x60, 0x01]);
        assert_eq!(
            hex::encode(&bytecode[2..22]),
            "86e65d11ef3c99abb34a8c903552906e906661fe"
        );
        assert_eq!(&bytecode[22..], &[0x60, 0x02]);
    }

    #[test]
    fn test_link_unknown_library() {
        let json = linked_artifact_json().replace("\"StringUtils\"", "\"OtherUtils\"");
        let artifact = Artifact::parse(&json).unwrap();
        let err = artifact.link(Profile::Testnet.libraries()).unwrap_err();
        assert!(matches!(err, ScriptError::LibraryLinking(_)));
    }

    #[test]
    fn test_link_detects_leftover_placeholders() {
        let json = format!(
            r#"{{"contractName": "A", "sourceName": "a.sol", "bytecode": "0x60{}"}}"#,
            PLACEHOLDER
        );
        let artifact = Artifact::parse(&json).unwrap();
        let err = artifact.link(Profile::Testnet.libraries()).unwrap_err();
        assert!(matches!(err, ScriptError::LibraryLinking(_)));
    }

    #[test]
    fn test_link_rejects_overflowing_offsets() {
        let artifact = artifact_with_offset("0x6001", "9223372036854775807", "20");
        let err = artifact.link(Profile::Testnet.libraries()).unwrap_err();
        assert!(matches!(err, ScriptError::LibraryLinking(_)));

        let artifact = artifact_with_offset("0x6001", "0", "9223372036854775807");
        let err = artifact.link(Profile::Testnet.libraries()).unwrap_err();
        assert!(matches!(err, ScriptError::LibraryLinking(_)));
    }

    #[test]
    fn test_link_rejects_out_of_bounds_offsets() {
        let artifact = artifact_with_offset(&format!("0x60{}", PLACEHOLDER), "2", "20");
        let err = artifact.link(Profile::Testnet.libraries()).unwrap_err();
        assert!(matches!(err, ScriptError::LibraryLinking(_)));

        // Placeholder length that doesn't fit an address
        let artifact = artifact_with_offset(&format!("0x6001{}", PLACEHOLDER), "2", "19");
        let err = artifact.link(Profile::Testnet.libraries()).unwrap_err();
        assert!(matches!(err, ScriptError::LibraryLinking(_)));
    }

    #[test]
    fn test_link_rejects_non_ascii_bytecode() {
        let bytecode = format!("0xa\u{e9}{}", "0".repeat(40));
        let artifact = artifact_with_offset(&bytecode, "1", "20");
        let err = artifact.link(Profile::Testnet.libraries()).unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }

    #[test]
    fn test_parse_factory_deps() {
        let json = r#"{
            "contractName": "Factory",
            "sourceName": "contracts/Factory.sol",
            "bytecode": "0x6001",
            "factoryDeps": {
                "0x0100000133ba2b58": "contracts/EmailAuth.sol:EmailAuth"
            }
        }"#;
        let artifact = Artifact::parse(json).unwrap();
        assert_eq!(artifact.factory_deps, vec!["contracts/EmailAuth.sol:EmailAuth"]);

        let err = Artifact::parse(&json.replace(r#""contracts/EmailAuth.sol:EmailAuth""#, "1"))
            .unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }

    #[test]
    fn test_deployable_collects_factory_deps() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact_with_deps(
            dir.path(),
            "contracts/Module.sol",
            "Module",
            "0x6001",
            &["contracts/Proxy.sol:Proxy", "contracts/Auth.sol:Auth"],
        );
        // Auth deploys the module back and the proxy again
        write_artifact_with_deps(
            dir.path(),
            "contracts/Auth.sol",
            "Auth",
            "0x6002",
            &["contracts/Module.sol:Module", "contracts/Proxy.sol:Proxy"],
        );
        write_artifact(dir.path(), "contracts/Proxy.sol", "Proxy", "0x6003");
        let store = ArtifactStore::new(dir.path(), Profile::Testnet.libraries());

        let deployable = store.deployable("Module").unwrap();
        assert_eq!(deployable.bytecode.to_vec(), vec![0x60, 0x01]);

        let mut deps: Vec<Vec<u8>> = deployable.factory_deps.iter().map(|d| d.to_vec()).collect();
        deps.sort();
        assert_eq!(deps, vec![vec![0x60, 0x02], vec![0x60, 0x03]]);

        let proxy = store.deployable("Proxy").unwrap();
        assert!(proxy.factory_deps.is_empty());
    }

    #[test]
    fn test_deployable_missing_factory_dep() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact_with_deps(
            dir.path(),
            "contracts/Module.sol",
            "Module",
            "0x6001",
            &["contracts/Gone.sol:Gone"],
        );
        let store = ArtifactStore::new(dir.path(), Profile::Testnet.libraries());

        assert!(matches!(
            store.deployable("Module"),
            Err(ScriptError::ArtifactNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_store_search_ignores_symlink_loops() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact(dir.path(), "contracts/Handler.sol", "Handler", "0x6001");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("contracts/loop")).unwrap();
        let store = ArtifactStore::new(dir.path(), Profile::Testnet.libraries());

        let path = store.path_for("Handler").unwrap();
        assert_eq!(
            path,
            dir.path().join("contracts/Handler.sol/Handler.json")
        );
    }

    #[test]
    fn test_store_resolves_names() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact(dir.path(), "contracts/Handler.sol", "Handler", "0x6001");
        write_artifact(
            dir.path(),
            "@openzeppelin/contracts/proxy/ERC1967/ERC1967Proxy.sol",
            "ERC1967Proxy",
            "0x6002",
        );
        let store = ArtifactStore::new(dir.path(), Profile::Testnet.libraries());

        let handler = store.load("Handler").unwrap();
        assert_eq!(handler.source_name, "contracts/Handler.sol");

        let proxy = store
            .linked_bytecode("@openzeppelin/contracts/proxy/ERC1967/ERC1967Proxy.sol:ERC1967Proxy")
            .unwrap();
        assert_eq!(proxy.to_vec(), vec![0x60, 0x02]);

        assert!(matches!(
            store.load("Missing"),
            Err(ScriptError::ArtifactNotFound(_))
        ));
    }

    #[test]
    fn test_store_rejects_ambiguous_names() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact(dir.path(), "contracts/A.sol", "Handler", "0x6001");
        write_artifact(dir.path(), "contracts/B.sol", "Handler", "0x6002");
        let store = ArtifactStore::new(dir.path(), Profile::Testnet.libraries());

        let err = store.load("Handler").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
        assert!(store.load("contracts/B.sol:Handler").is_ok());
    }
}
