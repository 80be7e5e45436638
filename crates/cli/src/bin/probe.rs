use anyhow::Result;
use clap::Parser;
use n8n_ops::inspector::{DEFAULT_WEBHOOK_PATH, DEFAULT_WORKFLOW_ID};
use n8n_ops::prober::{self, ProbeOptions};
use n8n_ops_api::{BASE_URL_ENV, N8nClient};

/// Probe webhook URL variants for a workflow and try a direct execution.
#[derive(Debug, Parser)]
#[command(name = "n8n-probe", version)]
struct Args {
    /// Instance base URL.
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,
    /// Workflow whose webhook URLs are probed and which is executed.
    #[arg(long, default_value = DEFAULT_WORKFLOW_ID)]
    workflow_id: String,
    #[arg(long, default_value = DEFAULT_WEBHOOK_PATH)]
    webhook_path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    n8n_ops::init_tracing();
    let args = Args::parse();

    let client = N8nClient::new_from_env(args.base_url.as_deref())?;
    let options = ProbeOptions {
        workflow_id: args.workflow_id,
        webhook_path: args.webhook_path,
    };
    prober::run(&client, &options).await;
    Ok(())
}
