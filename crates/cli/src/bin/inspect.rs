use anyhow::Result;
use clap::Parser;
use n8n_ops::inspector::{self, DEFAULT_NAME_PATTERN, DEFAULT_WEBHOOK_PATH, DEFAULT_WORKFLOW_ID, InspectOptions};
use n8n_ops_api::{BASE_URL_ENV, N8nClient};

/// List active n8n workflows, show their webhooks and cycle one workflow's activation.
#[derive(Debug, Parser)]
#[command(name = "n8n-inspect", version)]
struct Args {
    /// Instance base URL.
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,
    /// Case-insensitive substring selecting which workflows to inspect.
    #[arg(long, default_value = DEFAULT_NAME_PATTERN)]
    pattern: String,
    /// Workflow to deactivate and reactivate.
    #[arg(long, default_value = DEFAULT_WORKFLOW_ID)]
    workflow_id: String,
    /// Webhook path tested after reactivation.
    #[arg(long, default_value = DEFAULT_WEBHOOK_PATH)]
    webhook_path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    n8n_ops::init_tracing();
    let args = Args::parse();

    let client = N8nClient::new_from_env(args.base_url.as_deref())?;
    let options = InspectOptions {
        pattern: args.pattern,
        workflow_id: args.workflow_id,
        webhook_path: args.webhook_path,
    };
    inspector::run(&client, &options).await;
    Ok(())
}
