use clap::Args;
use cricp::{CopyOrchestrator, CpCommand, CricpConfig};

pub const AFTER_HELP: &str = "Examples:
  cricp cp web:/etc/hosts ./hosts
  cricp cp ./app.conf 'nginx-.*:/etc/nginx/conf.d/app.conf'

CONTAINER is a regular expression that must match exactly one container name.";

#[derive(Args, Debug)]
pub struct CpArgs {
    /// <SRC> <DST>, each either PATH or CONTAINER:PATH
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

pub async fn execute(
    args: CpArgs,
    global: &crate::cli::GlobalFlags,
    config: &CricpConfig,
) -> anyhow::Result<()> {
    let connector = global.create_connector(config)?;
    let orchestrator =
        CopyOrchestrator::new(connector, CpCommand::default(), global.copy_options());

    orchestrator.execute(&args.paths).await?;
    Ok(())
}
