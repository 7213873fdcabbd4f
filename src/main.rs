use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use standee::{
    ListingId, ListingUpdate, PipelineBuilder, PipelineError, ReportPeriod,
    SmtpNotificationTransport, StandeeConfig, StandeePipeline,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Generate, preview and mail printable table standees for listings.
#[derive(Parser, Debug)]
#[command(name = "standee", version, about, long_about = None)]
struct Cli {
    /// Configuration file stem (TOML), e.g. `config/standee`
    #[arg(long, env = "STANDEE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a listing's standee and write it to disk
    Generate {
        id: String,
        /// Output path; defaults to the artifact's own file name
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the substituted template markup for a listing
    Preview {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a listing's standee and mail it to the listing's owner
    Send { id: String },
    /// Approve a listing, or revoke its approval
    Approve {
        id: String,
        #[arg(long)]
        revoke: bool,
    },
    /// Change stored fields of a listing
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditFields,
    },
    /// List every listing, newest first
    List,
    /// Show total, approved and pending counts
    Stats,
    /// Report missing SMTP settings
    CheckEmail,
    /// Mail a standee for a built-in sample listing
    TestEmail { recipient: String },
    /// Report which placeholders the configured template uses
    CheckTemplate,
    /// Mail a listing's owner the quiz responses collected in a period
    SendAnalytics {
        id: String,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Mail every listing its analytics report
    BulkAnalytics {
        #[command(flatten)]
        period: PeriodArgs,
    },
}

/// Fields to overwrite; omitted flags leave a field unchanged.
#[derive(Args, Debug)]
struct EditFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    manager: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// An empty value removes the secondary contact
    #[arg(long)]
    secondary_email: Option<String>,
    #[arg(long)]
    mobile: Option<String>,
    #[arg(long)]
    telephone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    price: Option<String>,
}

impl From<EditFields> for ListingUpdate {
    fn from(fields: EditFields) -> Self {
        ListingUpdate {
            name: fields.name,
            category: fields.category,
            manager_name: fields.manager,
            email: fields.email,
            secondary_email: fields.secondary_email,
            mobile: fields.mobile,
            telephone: fields.telephone,
            address: fields.address,
            city: fields.city,
            state: fields.state,
            country: fields.country,
            postal_code: fields.postal_code,
            price: fields.price,
            is_approved: None,
        }
    }
}

/// Without dates the report covers the last 24 hours.
#[derive(Args, Debug)]
struct PeriodArgs {
    /// First day of the report (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the report (YYYY-MM-DD); defaults to today
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    fn period(&self) -> Result<ReportPeriod, PipelineError> {
        match self.from {
            None => Ok(ReportPeriod::LastDay),
            Some(from) => {
                let to = self.to.unwrap_or_else(|| Utc::now().date_naive());
                Ok(ReportPeriod::between(from, to)?)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(file) => StandeeConfig::load_from(file)?,
        None => StandeeConfig::load()?,
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling remote conversion.");
            on_interrupt.cancel();
        }
    });

    if let Command::CheckEmail = cli.command {
        let issues = config.smtp.issues();
        if issues.is_empty() {
            println!("SMTP configuration is complete ({}:{}).", config.smtp.host, config.smtp.port);
            return Ok(());
        }
        for issue in &issues {
            println!("- {}", issue);
        }
        std::process::exit(1);
    }

    let mut builder = PipelineBuilder::new().with_config(&config).with_cancellation(cancel);
    if matches!(
        cli.command,
        Command::Send { .. }
            | Command::TestEmail { .. }
            | Command::SendAnalytics { .. }
            | Command::BulkAnalytics { .. }
    ) {
        builder = builder.with_transport(Arc::new(SmtpNotificationTransport::from_config(&config.smtp)?));
    }
    let pipeline = builder.build()?;

    run(&pipeline, cli.command).await
}

async fn run(pipeline: &StandeePipeline, command: Command) -> Result<(), PipelineError> {
    match command {
        Command::Generate { id, out } => {
            let listing = pipeline.listing(&ListingId::from(id))?;
            let artifact = pipeline.generate_for(&listing).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(artifact.file_name(&listing)));
            fs::write(&path, &artifact.bytes)?;
            println!(
                "Wrote {:?} standee to {} (backend: {})",
                artifact.kind,
                path.display(),
                artifact.backend
            );
        }
        Command::Preview { id, out } => {
            let id = ListingId::from(id);
            let markup = pipeline.preview(&id)?;
            let path = out.unwrap_or_else(|| PathBuf::from(format!("preview_{}.html", id.short())));
            fs::write(&path, markup)?;
            println!("Wrote preview to {}", path.display());
        }
        Command::Send { id } => {
            let receipt = pipeline.send(&ListingId::from(id)).await?;
            match &receipt.cc {
                Some(cc) => println!("Sent {:?} standee to {} (cc {})", receipt.kind, receipt.to, cc),
                None => println!("Sent {:?} standee to {}", receipt.kind, receipt.to),
            }
        }
        Command::Approve { id, revoke } => {
            let listing = pipeline.approve(&ListingId::from(id), !revoke)?;
            println!(
                "{} [{}] is now {}",
                listing.name,
                listing.short_id(),
                if listing.is_approved { "approved" } else { "pending" }
            );
        }
        Command::Edit { id, fields } => {
            let update = ListingUpdate::from(fields);
            if update == ListingUpdate::default() {
                println!("Nothing to change.");
                return Ok(());
            }
            let listing = pipeline.update(&ListingId::from(id), update)?;
            println!("Updated {} [{}]", listing.name, listing.short_id());
        }
        Command::List => {
            for listing in pipeline.list()? {
                println!(
                    "{:<8}  {:<8}  {:<30}  {}",
                    listing.short_id(),
                    if listing.is_approved { "approved" } else { "pending" },
                    listing.name,
                    listing.email
                );
            }
        }
        Command::Stats => {
            let stats = pipeline.stats()?;
            println!("Total:    {}", stats.total);
            println!("Approved: {}", stats.approved);
            println!("Pending:  {}", stats.pending);
        }
        Command::TestEmail { recipient } => {
            let receipt = pipeline.send_sample(&recipient).await?;
            println!("Sent test {:?} standee to {}", receipt.kind, receipt.to);
        }
        Command::CheckTemplate => {
            let (present, missing) = pipeline.template_placeholders()?;
            for placeholder in &present {
                println!("  found    {}", placeholder.token());
            }
            for placeholder in &missing {
                println!("  missing  {}", placeholder.token());
            }
        }
        Command::SendAnalytics { id, period } => {
            let receipt = pipeline
                .send_analytics(&ListingId::from(id), &period.period()?)
                .await?;
            println!(
                "Sent {} responses to {} as {}",
                receipt.response_count, receipt.to, receipt.file_name
            );
        }
        Command::BulkAnalytics { period } => {
            let summary = pipeline.send_bulk_analytics(&period.period()?).await?;
            println!("Sent: {}", summary.sent);
            println!("Failed: {}", summary.failed.len());
            for name in &summary.failed {
                println!("  - {}", name);
            }
        }
        Command::CheckEmail => {}
    }
    Ok(())
}
