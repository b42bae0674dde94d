use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cellclinic_admin::api::{ApiClient, CatalogRecord, Inquiry};
use cellclinic_admin::auth::{resolve_token, TokenStore};
use cellclinic_admin::backup::{self, BackupContents, ImageOutcome};
use cellclinic_admin::catalog::{self, record_label};
use cellclinic_admin::config::{AppConfig, CliConfig, FileConfig};
use cellclinic_admin::inquiries::{self, InquiryStatus};
use cellclinic_admin::reports::{self, ReportKind};
use cellclinic_admin::{import, restore};
use cli_style::{
    get_styles, print_error, print_info, print_key_value, print_list_item, print_section_header,
    print_success, print_warning,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "cellclinic-admin", version = env!("CLI_VERSION"), styles = get_styles())]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Base URL of the catalog backend API.
    #[clap(long)]
    pub base_url: Option<String>,

    /// Business name used in backup file names.
    #[clap(long)]
    pub business_name: Option<String>,

    /// Timeout in seconds for regular requests.
    #[clap(long, default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// Timeout in seconds for the restore upload.
    #[clap(long, default_value_t = 60)]
    pub restore_timeout_sec: u64,

    /// File where the admin token is kept between runs.
    #[clap(long, value_parser = parse_path)]
    pub token_path: Option<PathBuf>,

    /// Directory where downloaded files are written.
    #[clap(long, value_parser = parse_path)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as admin and store the token.
    Login { email: String, password: String },

    /// Forget the stored admin token.
    Logout,

    /// Download a full backup archive with images extracted.
    Backup,

    /// Replace the whole backend dataset with a backup archive.
    /// This is destructive and cannot be undone.
    Restore {
        #[clap(value_parser = parse_path)]
        file: PathBuf,

        /// Confirm that the current data will be replaced.
        #[clap(long)]
        yes: bool,
    },

    /// Check a backup archive locally without contacting the backend.
    Inspect {
        #[clap(value_parser = parse_path)]
        file: PathBuf,
    },

    /// Download an Excel report or the JSON database dump.
    Report {
        #[clap(value_enum)]
        kind: ReportKind,

        /// Restrict the report to one brand.
        #[clap(long)]
        brand: Option<String>,
    },

    /// Bulk import catalog entries from an Excel sheet.
    Import {
        #[clap(value_parser = parse_path)]
        file: PathBuf,

        /// Import into a single brand.
        #[clap(long)]
        brand: Option<String>,
    },

    /// List all brands.
    Brands,

    /// List the devices of a brand.
    Devices { brand: String },

    /// List the repair services offered for a device.
    Services { device: String },

    /// Track customer repair inquiries.
    Inquiries {
        #[command(subcommand)]
        action: InquiryAction,
    },
}

#[derive(Subcommand, Debug)]
enum InquiryAction {
    /// List inquiries with their status.
    List {
        /// Only show inquiries with this status.
        #[clap(long, value_enum)]
        status: Option<InquiryStatus>,
    },

    /// Move an inquiry to a new status.
    SetStatus {
        id: String,

        #[clap(value_enum)]
        status: InquiryStatus,
    },

    /// Delete one inquiry.
    Delete { id: String },

    /// Delete every inquiry. This cannot be undone.
    Clear {
        /// Confirm that all inquiries will be deleted.
        #[clap(long)]
        yes: bool,
    },
}

impl CliArgs {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            base_url: self.base_url.clone(),
            business_name: self.business_name.clone(),
            request_timeout_sec: self.request_timeout_sec,
            restore_timeout_sec: self.restore_timeout_sec,
            token_path: self.token_path.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

fn make_client(config: &AppConfig, tokens: &TokenStore) -> Result<ApiClient> {
    let client = ApiClient::new(config.base_url.clone(), config.request_timeout_sec)?
        .with_token(resolve_token(tokens)?)
        .with_restore_timeout(config.restore_timeout());
    if !client.has_token() {
        print_warning("No admin token found, requests are sent unauthenticated. Run `login` first.");
    }
    Ok(client)
}

fn print_records(title: &str, records: &[CatalogRecord]) {
    print_section_header(&format!("{} ({})", title, records.len()));
    for record in records {
        print_list_item(&record_label(record));
    }
}

fn print_inquiry(inquiry: &Inquiry) {
    print_section_header(inquiry.device_model.as_deref().unwrap_or("Unknown device"));
    print_key_value("ID", &inquiry.id);
    print_key_value("Status", inquiry.status.as_deref().unwrap_or("Pending"));
    print_key_value("Customer", inquiry.name.as_deref().unwrap_or("-"));
    print_key_value("Mobile", inquiry.mobile_number.as_deref().unwrap_or("-"));
    if let Some(price) = inquiry.total_estimated_price {
        print_key_value("Estimate", &format!("₹{}", price));
    }
    if let Some(created_at) = &inquiry.created_at {
        print_key_value("Created", created_at);
    }
}

async fn run_inquiry_action(client: &ApiClient, action: InquiryAction) -> Result<()> {
    match action {
        InquiryAction::List { status } => {
            let all = inquiries::list_inquiries(client).await?;
            let shown: Vec<&Inquiry> = match status {
                Some(status) => inquiries::filter_by_status(&all, status),
                None => all.iter().collect(),
            };
            for inquiry in &shown {
                print_inquiry(inquiry);
            }
            print_section_header("Summary");
            for (status, count) in inquiries::count_by_status(&all) {
                print_key_value(&status, &count.to_string());
            }
            print_info(&format!("{} of {} inquiries shown", shown.len(), all.len()));
        }
        InquiryAction::SetStatus { id, status } => {
            let message = inquiries::update_status(client, &id, status).await?;
            print_success(&message);
        }
        InquiryAction::Delete { id } => {
            let message = inquiries::delete_inquiry(client, &id).await?;
            print_success(&message);
        }
        InquiryAction::Clear { yes } => {
            if !yes {
                print_warning("This deletes every customer inquiry on the backend.");
                bail!("Refusing to delete all inquiries without --yes");
            }
            let message = inquiries::delete_all_inquiries(client).await?;
            print_success(&message);
        }
    }
    Ok(())
}

async fn run(args: CliArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&args.cli_config(), file_config)?;
    let tokens = TokenStore::new(config.token_path.clone());
    info!("Using backend at {}", config.base_url);

    match args.command {
        Command::Login { email, password } => {
            let client = ApiClient::new(config.base_url.clone(), config.request_timeout_sec)?;
            let token = client
                .login(&email, &password)
                .await
                .context("Login failed")?;
            tokens.save(&token)?;
            print_success(&format!("Logged in, token stored at {:?}", tokens.path()));
        }
        Command::Logout => {
            if tokens.clear()? {
                print_success("Logged out");
            } else {
                print_info("No stored token");
            }
        }
        Command::Backup => {
            let client = make_client(&config, &tokens)?;
            let archive = backup::create_backup(&client, &config.business_name).await?;
            for record in archive.report.skipped() {
                if let ImageOutcome::Skipped(reason) = &record.outcome {
                    print_warning(&format!(
                        "Kept image of {} {:?}: {}",
                        record.collection,
                        record.name.as_deref().unwrap_or("unnamed"),
                        reason
                    ));
                }
            }
            for record in archive.report.renamed() {
                if let ImageOutcome::Packed {
                    path,
                    renamed_from: Some(wanted),
                } = &record.outcome
                {
                    print_info(&format!("{} was taken, stored as {}", wanted, path));
                }
            }
            let path = archive
                .save_to(&config.output_dir)
                .await
                .context("Failed to write backup archive")?;
            print_success(&format!(
                "Backup saved to {:?} ({} images)",
                path,
                archive.report.packed_count()
            ));
        }
        Command::Restore { file, yes } => {
            if !yes {
                print_warning("Restore replaces ALL catalog data and inquiries on the backend.");
                bail!("Refusing to restore without --yes");
            }
            let client = make_client(&config, &tokens)?;
            let outcome = restore::restore_file(&client, &file).await?;
            print_success(&outcome.message);
        }
        Command::Inspect { file } => {
            let bytes = std::fs::read(&file).with_context(|| format!("Failed to read {:?}", file))?;
            let contents = BackupContents::read(&bytes)?;
            let summary = contents.verify()?;
            print_section_header("Backup archive");
            print_key_value("Brands", &summary.brands.to_string());
            print_key_value("Devices", &summary.devices.to_string());
            print_key_value("Services", &summary.services.to_string());
            print_key_value("Inquiries", &summary.inquiries.to_string());
            print_key_value(
                "Images",
                &format!("{} ({} bytes)", summary.images, summary.image_bytes),
            );
            for path in contents.images.keys() {
                print_list_item(path);
            }
            print_success("Archive is well formed");
        }
        Command::Report { kind, brand } => {
            let client = make_client(&config, &tokens)?;
            let path =
                reports::download_report(&client, kind, brand.as_deref(), &config.output_dir)
                    .await?;
            print_success(&format!("Saved {:?}", path));
        }
        Command::Import { file, brand } => {
            let client = make_client(&config, &tokens)?;
            let message = import::upload_catalog_excel(&client, &file, brand.as_deref()).await?;
            print_success(&message);
        }
        Command::Brands => {
            let client = make_client(&config, &tokens)?;
            print_records("Brands", &catalog::list_brands(&client).await?);
        }
        Command::Devices { brand } => {
            let client = make_client(&config, &tokens)?;
            print_records("Devices", &catalog::list_devices(&client, &brand).await?);
        }
        Command::Services { device } => {
            let client = make_client(&config, &tokens)?;
            print_records("Services", &catalog::list_services(&client, &device).await?);
        }
        Command::Inquiries { action } => {
            let client = make_client(&config, &tokens)?;
            run_inquiry_action(&client, action).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli_args = CliArgs::parse();

    let subscriber_init = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init();
    if let Err(e) = subscriber_init {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli_args).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
