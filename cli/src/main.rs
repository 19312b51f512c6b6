mod file_store;
mod terminal;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use authgate::config::{AuthConfig, SupabaseConfig};
use authgate::designer::{self, DocumentMarkers, FrameAccess, HostSnapshot};
use authgate::error::AuthError;
use authgate::gate::{GateController, GateMachine};
use authgate::login::{FormMessage, FormState, LoginController, LoginMode};
use authgate::provider::IdentityProvider;
use authgate::store::Store;
use authgate::supabase::SupabaseAuth;
use clap::{Args, Parser, Subcommand};

use crate::file_store::FileSessionStore;
use crate::terminal::{TerminalNavigator, TokioSleeper};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing Supabase project; pass --supabase-url and --anon-key or set SUPABASE_URL and SUPABASE_ANON_KEY")]
    MissingProject,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    FormError(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "authgate", about = "Run AuthGate and LoginForm flows against a Supabase project")]
struct Cli {
    /// Project URL. Falls back to `SUPABASE_URL` together with `SUPABASE_ANON_KEY`.
    #[arg(long, requires = "anon_key")]
    supabase_url: Option<String>,

    #[arg(long, requires = "supabase_url")]
    anon_key: Option<String>,

    #[arg(long, env = "AUTHGATE_SESSION_FILE", default_value = ".authgate-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored session, refreshing it if it has expired.
    Session,
    /// Submit the login form in sign-in mode.
    SignIn(CredentialArgs),
    /// Submit the login form in sign-up mode.
    SignUp(CredentialArgs),
    SignOut,
    /// Mount an auth gate and report where it settles.
    Gate(GateArgs),
    /// Classify a described host page as Designer canvas or live site.
    Detect(DetectArgs),
}

#[derive(Args, Debug)]
struct CredentialArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "AUTHGATE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct GateArgs {
    /// Press the logout button once the gate has settled.
    #[arg(long, default_value_t = false)]
    logout: bool,
}

#[derive(Args, Debug)]
struct DetectArgs {
    /// Value of `Webflow.env.mode`.
    #[arg(long)]
    editor_mode: Option<String>,

    /// Value of `data-wf-mode` on `<html>`.
    #[arg(long)]
    html_mode: Option<String>,

    #[arg(long = "html-class")]
    html_classes: Vec<String>,

    #[arg(long = "body-class")]
    body_classes: Vec<String>,

    #[arg(long, default_value = "")]
    referrer: String,

    #[arg(long, default_value = "localhost")]
    hostname: String,

    #[arg(long, default_value = "/")]
    path: String,

    /// Page is framed by a parent that cannot be read.
    #[arg(long, default_value_t = false)]
    cross_origin_frame: bool,
}

type Auth = Rc<SupabaseAuth<FileSessionStore>>;

struct CliContext {
    config: AuthConfig,
    auth: Auth,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let Cli { supabase_url, anon_key, session_file, command } = Cli::parse();

    let connect = move || -> Result<CliContext, CliError> {
        let supabase = match (supabase_url, anon_key) {
            (Some(url), Some(key)) => SupabaseConfig::new(url, key),
            _ => SupabaseConfig::from_env().ok_or(CliError::MissingProject)?,
        };
        let config = AuthConfig::with_supabase(supabase);
        let auth = Rc::new(SupabaseAuth::new(config.supabase.clone(), FileSessionStore::new(session_file)));
        Ok(CliContext { config, auth })
    };

    match command {
        Command::Session => run_session(&connect()?).await,
        Command::SignIn(args) => run_login(&connect()?, LoginMode::SignIn, args).await,
        Command::SignUp(args) => run_login(&connect()?, LoginMode::SignUp, args).await,
        Command::SignOut => run_sign_out(&connect()?).await,
        Command::Gate(args) => run_gate(&connect()?, args).await,
        Command::Detect(args) => {
            run_detect(args);
            Ok(())
        }
    }
}

async fn run_session(ctx: &CliContext) -> Result<(), CliError> {
    match ctx.auth.get_session().await? {
        Some(session) => print_json(&session),
        None => {
            println!("no session");
            Ok(())
        }
    }
}

/// Form state that echoes each new message, like the form's banner would.
#[derive(Clone)]
struct EchoForm(Rc<RefCell<FormState>>);

impl Store<FormState> for EchoForm {
    fn update<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> Option<R> {
        let mut form = self.0.borrow_mut();
        let before = form.message.clone();
        let out = f(&mut form);
        if form.message != before {
            match &form.message {
                FormMessage::None => {}
                FormMessage::Error(text) => eprintln!("error: {text}"),
                FormMessage::Success(text) => println!("{text}"),
            }
        }
        Some(out)
    }

    fn read<R>(&self, f: impl FnOnce(&FormState) -> R) -> Option<R> {
        Some(f(&self.0.borrow()))
    }
}

async fn run_login(ctx: &CliContext, mode: LoginMode, args: CredentialArgs) -> Result<(), CliError> {
    let form = EchoForm(Rc::new(RefCell::new(FormState::new(true))));
    form.update(|f| {
        f.set_email(args.email);
        f.set_password(args.password);
        if f.mode != mode {
            f.toggle_mode();
        }
    });

    let controller = LoginController::new(
        Rc::clone(&ctx.auth),
        TerminalNavigator,
        TokioSleeper,
        form.clone(),
        ctx.config.redirects.clone(),
        ctx.config.timings,
    );
    controller.submit().await;

    let failure = form.read(|f| f.error().map(str::to_owned)).flatten();
    match failure {
        Some(message) => Err(CliError::FormError(message)),
        None => Ok(()),
    }
}

async fn run_sign_out(ctx: &CliContext) -> Result<(), CliError> {
    ctx.auth.sign_out().await?;
    println!("signed out");
    Ok(())
}

async fn run_gate(ctx: &CliContext, args: GateArgs) -> Result<(), CliError> {
    let machine = Rc::new(RefCell::new(GateMachine::new(false, true)));
    let gate = GateController::new(
        Rc::clone(&ctx.auth),
        TerminalNavigator,
        Rc::clone(&machine),
        ctx.config.redirects.clone(),
    );

    gate.mount().await;
    println!("status: {:?}", machine.borrow().status());
    if args.logout {
        gate.logout().await;
    }
    gate.teardown();
    Ok(())
}

fn run_detect(args: DetectArgs) {
    let host = HostSnapshot {
        editor_mode: args.editor_mode,
        document: Some(DocumentMarkers {
            root_mode: args.html_mode,
            root_classes: args.html_classes,
            body_classes: args.body_classes,
        }),
        referrer: args.referrer,
        frame: if args.cross_origin_frame { FrameAccess::CrossOrigin } else { FrameAccess::TopLevel },
        hostname: args.hostname,
        pathname: args.path,
    };
    match designer::detect(&host) {
        Some(signal) => println!("designer mode ({signal:?})"),
        None => println!("live site"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
