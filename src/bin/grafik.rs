extern crate grafik as lib;

use flexi_logger::{FileSpec, Logger};
use lib::config;
use lib::events::Dispatcher;
use lib::planner::Planner;
use lib::session;
use lib::submit::Client;
use lib::ui::App;
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "grafik",
    about = "Grafik - interactive duty-roster calendar client."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        long = "cookie-file",
        help = "path to the browser-exported cookie file",
        parse(from_os_str)
    )]
    pub cookie_file: Option<PathBuf>,

    #[structopt(long = "base-url", help = "scheduler server base URL")]
    pub base_url: Option<String>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    const TERMINAL_FD: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(
        termios::tcgetattr(TERMINAL_FD).expect("Failed to get terminal attributes"),
    );

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        let _ = termios::tcsetattr(
            TERMINAL_FD,
            termios::SetArg::TCSANOW,
            &orig_attr.lock().unwrap(),
        );

        println!("Grafik ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config = config::load_suitable_config(args.configfile.as_deref())?;

    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if args.cookie_file.is_some() {
        config.cookie_file = args.cookie_file;
    }

    // Session gate: without the login cookie flag there is nothing to show.
    let authenticated = match &config.cookie_file {
        Some(path) => match session::load_session(path) {
            Ok(authenticated) => authenticated,
            Err(err) => {
                log::warn!("could not read cookie file {}: {}", path.display(), err);
                false
            }
        },
        None => false,
    };

    if !authenticated {
        println!("{}", session::MSG_LOGIN_PROMPT);
        println!("{}", session::login_url(&config.base_url));
        return Ok(());
    }

    let dispatcher = Dispatcher::from_config(&config);

    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let client = Client::new(&config.base_url)?;
    let planner = Planner::new(
        chrono::Local::now().date_naive(),
        config.year_span,
        config.redirect_delay(),
    );

    let mut app = App::new(&config, planner, client);

    let redirect = app.run(dispatcher, term)?;

    if let Some(url) = redirect {
        println!("Przekierowanie: {}", url);
    }

    Ok(())
}
