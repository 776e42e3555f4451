use memhex::{DumpSource, HarnessConfig, TestKind, convert_in_place};

use super::types::{Args, Command};

impl Args {
    pub fn execute(&self) -> Result<(), memhex::Error> {
        match &self.command {
            Command::Init { path } => {
                let stats = convert_in_place(path, DumpSource::Simulation.policy())?;
                log::debug!("{} records written", stats.records);
            }
            Command::Reference { path } => {
                let stats = convert_in_place(path, DumpSource::ReferenceModel.policy())?;
                log::debug!("{} records written", stats.records);
            }
            Command::List {
                root,
                arch,
                kind,
                filter,
            } => {
                let kind: TestKind = kind.parse()?;
                let config = HarnessConfig::new(root, arch.as_str(), kind, filter.clone())?;
                for case in config.discover()? {
                    println!(
                        "{}\t{}",
                        case.source().display(),
                        case.reference_log_path().display()
                    );
                }
            }
        }
        Ok(())
    }
}
