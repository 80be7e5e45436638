use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use n8n_ops::importer::{self, DEFAULT_WORKFLOW_FILE};
use n8n_ops_api::{BASE_URL_ENV, N8nClient};

/// Import a workflow definition into n8n and activate it.
#[derive(Debug, Parser)]
#[command(name = "n8n-import", version)]
struct Args {
    /// Instance base URL.
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,
    /// Workflow definition to import.
    #[arg(long, short = 'f', default_value = DEFAULT_WORKFLOW_FILE)]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    n8n_ops::init_tracing();
    let args = Args::parse();

    n8n_ops::print_banner("N8N WORKFLOW IMPORT", 50);

    let workflow = match importer::load_workflow_file(&args.file) {
        Ok(workflow) => {
            println!("Workflow loaded from {}", args.file.display());
            workflow
        }
        Err(error) => {
            println!("{}", error);
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = N8nClient::new_from_env(args.base_url.as_deref())?;
    importer::run(&client, &workflow).await;
    Ok(ExitCode::SUCCESS)
}
