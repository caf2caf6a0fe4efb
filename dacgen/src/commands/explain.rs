use clap::Args;
use eyre::Result;

use super::RunArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ExplainCommand {
    #[command(flatten)]
    pub run: RunArgs,
}

impl ExplainCommand {
    pub fn run(&self) -> Result<()> {
        let generator = self.run.generator();

        let report = ops::explain(&generator, &self.run.options(), self.run.config_path())?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
