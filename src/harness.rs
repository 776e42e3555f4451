//! Test-suite layout: which sources exist for an architecture, and where each
//! stage leaves the dumps that get cleaned before comparison.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use thiserror::Error;
use walkdir::WalkDir;

use crate::convert::{ConversionStats, ConvertError, convert_in_place};
use crate::region::RegionPolicy;

pub const DEFAULT_ARCH: &str = "RV32I";
pub const INIT_DUMP: &str = "meminit.hex";
pub const CPU_DUMP: &str = "cpu.hex";
const VERIFICATION_DIR: &str = "verification";

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{0} is not a supported test type")]
    UnsupportedTestKind(String),

    #[error("no {kind} tests exist for {arch} (supported: {})", supported.join(", "))]
    UnsupportedArch {
        arch: String,
        kind: TestKind,
        supported: Vec<String>,
    },

    #[error("invalid test path: {}", .0.display())]
    InvalidTestPath(PathBuf),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestKind {
    #[default]
    Asm,
    C,
    SelfCheck,
}

impl TestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Asm => "asm",
            TestKind::C => "c",
            TestKind::SelfCheck => "self",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            TestKind::Asm => &["S"],
            TestKind::C => &["c"],
            TestKind::SelfCheck => &["S", "c"],
        }
    }

    fn tests_dir(self, root: &Path) -> PathBuf {
        root.join(VERIFICATION_DIR)
            .join(format!("{}-tests", self.as_str()))
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asm" => Ok(TestKind::Asm),
            "c" => Ok(TestKind::C),
            "self" => Ok(TestKind::SelfCheck),
            other => Err(HarnessError::UnsupportedTestKind(other.to_string())),
        }
    }
}

/// Origin of a memory dump, which fixes its region policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpSource {
    /// Memory image produced for the RTL simulation.
    Simulation,
    /// Signature log written by the reference ISA simulator.
    ReferenceModel,
}

impl DumpSource {
    pub fn policy(self) -> RegionPolicy {
        match self {
            DumpSource::Simulation => RegionPolicy::HeaderSkip,
            DumpSource::ReferenceModel => RegionPolicy::OffsetStart,
        }
    }
}

/// Immutable run configuration, validated once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    root: PathBuf,
    arch: String,
    kind: TestKind,
    filter: Option<String>,
}

impl HarnessConfig {
    pub fn new(
        root: impl Into<PathBuf>,
        arch: impl Into<String>,
        kind: TestKind,
        filter: Option<String>,
    ) -> Result<Self, HarnessError> {
        let root = root.into();
        let arch = arch.into();
        let supported = Self::supported_archs(&root, kind)?;
        if !supported.iter().any(|a| *a == arch) {
            return Err(HarnessError::UnsupportedArch {
                arch,
                kind,
                supported,
            });
        }
        Ok(Self {
            root,
            arch,
            kind,
            filter,
        })
    }

    /// Architectures with a test directory for `kind`, sorted.
    pub fn supported_archs(root: &Path, kind: TestKind) -> Result<Vec<String>, HarnessError> {
        let dir = kind.tests_dir(root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut archs = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                archs.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        archs.sort();
        Ok(archs)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn kind(&self) -> TestKind {
        self.kind
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn arch_dir(&self) -> PathBuf {
        self.kind.tests_dir(&self.root).join(&self.arch)
    }

    pub fn init_dump_path(&self) -> PathBuf {
        self.root.join(INIT_DUMP)
    }

    pub fn cpu_dump_path(&self) -> PathBuf {
        self.root.join(CPU_DUMP)
    }

    /// Test sources for the configured kind and architecture, sorted by path.
    pub fn discover(&self) -> Result<Vec<TestCase>, HarnessError> {
        let extensions = self.kind.extensions();
        let mut cases = Vec::new();

        for entry in WalkDir::new(self.arch_dir())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let ext_matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e));
            let name = entry.file_name().to_string_lossy();
            let filter_matches = self.filter.as_deref().is_none_or(|f| name.starts_with(f));
            if ext_matches && filter_matches {
                cases.push(TestCase::new(self.root.clone(), path.to_path_buf())?);
            }
        }

        debug!(
            "discovered {} {} tests for {}",
            cases.len(),
            self.kind,
            self.arch
        );
        Ok(cases)
    }
}

/// One test source plus the paths its pipeline stages use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    root: PathBuf,
    source: PathBuf,
    stem: String,
}

impl TestCase {
    pub fn new(root: PathBuf, source: PathBuf) -> Result<Self, HarnessError> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HarnessError::InvalidTestPath(source.clone()))?
            .to_string();
        Ok(Self { root, source, stem })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn elf_path(&self) -> PathBuf {
        self.source.with_extension("elf")
    }

    pub fn reference_log_path(&self) -> PathBuf {
        self.source.with_file_name(format!("{}_spike.hex", self.stem))
    }

    pub fn init_dump_path(&self) -> PathBuf {
        self.root.join(INIT_DUMP)
    }

    pub fn cpu_dump_path(&self) -> PathBuf {
        self.root.join(CPU_DUMP)
    }

    /// Rewrite the simulation memory image in canonical form.
    pub fn clean_init_dump(&self) -> Result<ConversionStats, ConvertError> {
        convert_in_place(&self.init_dump_path(), DumpSource::Simulation.policy())
    }

    /// Rewrite the reference simulator's signature log in canonical form.
    pub fn clean_reference_log(&self) -> Result<ConversionStats, ConvertError> {
        convert_in_place(
            &self.reference_log_path(),
            DumpSource::ReferenceModel.policy(),
        )
    }
}
