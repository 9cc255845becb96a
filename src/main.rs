use chrono::Local;
use clap::{Parser, Subcommand};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use billed::config::{config_dir, init_config_dir, load_config, Config};
use billed::model::{User, UserType, USER_KEY};
use billed::page::{FileInput, IconEye, NewBillForm, Page, SelectedFile};
use billed::session::JWT_KEY;
use billed::{
    logging, views, BilledError, Bills, FileSession, HttpStore, NewBill, Navigator, Result, Route,
    SessionStore, SubmitOutcome, UploadOutcome,
};

#[derive(Parser)]
#[command(name = "billed")]
#[command(version, about = "Employee expense-report client", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.billed or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List my bills
    Bills,

    /// Upload a receipt and submit a new bill
    NewBill {
        /// Receipt image (jpg, jpeg or png)
        #[arg(short, long)]
        file: PathBuf,

        /// Expense type
        #[arg(short = 't', long = "type", default_value = "Transports")]
        expense_type: String,

        /// Expense name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Expense date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Amount including VAT, in euros
        #[arg(short, long)]
        amount: String,

        /// VAT amount
        #[arg(long, default_value = "")]
        vat: String,

        /// VAT percentage (default: 20)
        #[arg(long, default_value = "")]
        pct: String,

        #[arg(short, long, default_value = "")]
        commentary: String,
    },

    /// Open the receipt of a bill
    Preview {
        /// Index from 'bills' (e.g., 1)
        bill: String,
    },
}

/// Records the page the controllers asked for
#[derive(Default)]
struct Router {
    current: RefCell<Option<(Route, Option<String>)>>,
}

impl Router {
    fn current(&self) -> Option<(Route, Option<String>)> {
        self.current.borrow().clone()
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route, message: Option<&str>) {
        tracing::debug!(route = %route, "navigate");
        *self.current.borrow_mut() = Some((route, message.map(str::to_string)));
    }
}

struct TerminalPage;

impl Page for TerminalPage {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn open_modal(&self, file_url: &str) {
        println!("Opening {file_url}");
        if let Err(e) = open_url(file_url) {
            tracing::error!(error = %e, "failed to open receipt viewer");
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    let level = load_config(&cfg_dir)
        .map(|c| c.log.level)
        .unwrap_or_else(|_| "warn".to_string());
    logging::init(&level);

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Login { email, password } => cmd_login(&cfg_dir, &email, &password),
        Commands::Logout => cmd_logout(&cfg_dir),
        Commands::Whoami => cmd_whoami(&cfg_dir),
        Commands::Bills => cmd_bills(&cfg_dir),
        Commands::NewBill {
            file,
            expense_type,
            name,
            date,
            amount,
            vat,
            pct,
            commentary,
        } => {
            let form = NewBillForm {
                expense_type,
                expense_name: name,
                datepicker: date.unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string()),
                amount,
                vat,
                pct,
                commentary,
            };
            cmd_new_bill(&cfg_dir, &file, &form)
        }
        Commands::Preview { bill } => cmd_preview(&cfg_dir, &bill),
    }
}

fn open(cfg_dir: &Path) -> Result<(Config, FileSession)> {
    if !cfg_dir.exists() {
        return Err(BilledError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok((load_config(cfg_dir)?, FileSession::open(cfg_dir)?))
}

fn http_store(config: &Config, session: &FileSession) -> Result<HttpStore> {
    HttpStore::new(
        &config.api.base_url,
        config.api.timeout(),
        session.get_item(JWT_KEY),
    )
}

/// Initialize config directory with the template config
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    init_config_dir(cfg_dir)?;

    println!("Initialized billed config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point the client at your API:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Log in:                        billed login --email <email> --password <password>");

    Ok(())
}

fn cmd_login(cfg_dir: &Path, email: &str, password: &str) -> Result<()> {
    let (config, session) = open(cfg_dir)?;
    let store = HttpStore::new(&config.api.base_url, config.api.timeout(), None)?;

    let jwt = store.login(email, password)?;
    let user = User {
        user_type: UserType::Employee,
        email: Some(email.to_string()),
    };
    session.set_item(JWT_KEY, &jwt)?;
    session.set_item(USER_KEY, &serde_json::to_string(&user)?)?;

    println!("Logged in as {email}");
    Ok(())
}

fn cmd_logout(cfg_dir: &Path) -> Result<()> {
    let (_, session) = open(cfg_dir)?;
    session.clear()?;
    println!("Logged out");
    Ok(())
}

fn cmd_whoami(cfg_dir: &Path) -> Result<()> {
    let (_, session) = open(cfg_dir)?;
    let user = User::from_session(&session).ok_or(BilledError::NotLoggedIn)?;

    println!(
        "{} ({:?})",
        user.email.as_deref().unwrap_or("unknown"),
        user.user_type
    );
    Ok(())
}

/// Fetch bills, sending the user to the error page on failure
fn fetch_bills(cfg_dir: &Path) -> Result<Vec<billed::FormattedBill>> {
    let (config, session) = open(cfg_dir)?;
    let store = http_store(&config, &session)?;
    let router = Router::default();
    let page = TerminalPage;

    let bills = Bills::new(&page, &router, &store, &session);
    match bills.get_bills() {
        Ok(mut bills) => {
            views::sort_for_display(&mut bills);
            Ok(bills)
        }
        Err(e) => {
            if let Some((Route::ErrorPage, message)) = router.current() {
                println!("{}", views::render_error(message.as_deref()));
            }
            Err(e)
        }
    }
}

fn cmd_bills(cfg_dir: &Path) -> Result<()> {
    let bills = fetch_bills(cfg_dir)?;
    println!("{}", views::render_bills(&bills));
    Ok(())
}

fn cmd_new_bill(cfg_dir: &Path, file: &Path, form: &NewBillForm) -> Result<()> {
    let (config, session) = open(cfg_dir)?;
    if !file.exists() {
        return Err(BilledError::ReceiptNotFound(file.to_path_buf()));
    }

    let store = http_store(&config, &session)?;
    let router = Router::default();
    let page = TerminalPage;
    let mut new_bill = NewBill::new(&page, &router, &store, &session);

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut input = FileInput::with_file(
        file.to_string_lossy(),
        SelectedFile {
            content_type: content_type(&name).to_string(),
            name: name.clone(),
            bytes: fs::read(file)?,
        },
    );

    match new_bill.handle_change_file(&mut input) {
        UploadOutcome::Uploaded(upload) => {
            println!("Uploaded {} (bill {})", upload.file_name, upload.bill_id);
        }
        UploadOutcome::Rejected | UploadOutcome::NoFile => {
            return Err(BilledError::InvalidReceipt(name));
        }
        UploadOutcome::Failed(e) => return Err(e),
    }

    match new_bill.handle_submit(form) {
        SubmitOutcome::Submitted(bill) => println!("Submitted bill {}", bill.id),
        SubmitOutcome::Failed(e) => return Err(e),
    }

    if let Some((Route::Bills, _)) = router.current() {
        cmd_bills(cfg_dir)?;
    }
    Ok(())
}

fn cmd_preview(cfg_dir: &Path, reference: &str) -> Result<()> {
    let bills = fetch_bills(cfg_dir)?;

    let idx: usize = reference
        .parse()
        .map_err(|_| BilledError::InvalidBillIndex(reference.to_string()))?;
    if idx == 0 || idx > bills.len() {
        return Err(BilledError::InvalidBillIndex(reference.to_string()));
    }

    let bill = &bills[idx - 1];
    let bill_url = bill
        .file_url
        .clone()
        .ok_or_else(|| BilledError::NoReceipt(bill.id.clone()))?;

    let (config, session) = open(cfg_dir)?;
    let store = http_store(&config, &session)?;
    let router = Router::default();
    let page = TerminalPage;
    Bills::new(&page, &router, &store, &session).handle_click_icon_eye(&IconEye { bill_url });
    Ok(())
}

fn content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

fn open_url(target: &str) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(target).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(target).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", target])
            .spawn()?;
    }
    Ok(())
}
