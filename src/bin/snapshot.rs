use std::{error::Error, fs::OpenOptions, io, process::exit, sync::Arc};

use clap::Parser;
use maud::{Markup, html};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use budgeteur_client::{
    AppHandle, AppState, ClientConfig, Dialogs, HttpTransport, PageOptions, Resource,
    UserSession,
    dom::Element,
    forms::{AsyncForm, LogInForm},
    pages::TransactionsPage,
    widgets::{AccountsWidget, UserWidget},
};

/// Log in to a budgeteur server and print the rendered accounts sidebar and,
/// optionally, the transactions page of one account.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The root URL of the budgeteur API.
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: String,

    /// The email address to log in with.
    #[arg(long)]
    email: String,

    /// The password to log in with. Prompted for when omitted.
    #[arg(long)]
    password: Option<String>,

    /// Also render the transactions page for this account.
    #[arg(long)]
    account_id: Option<String>,
}

/// Writes alerts to stderr and declines every confirmation, since a snapshot
/// never removes anything.
struct ConsoleDialogs;

impl Dialogs for ConsoleDialogs {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm(&self, message: &str) -> bool {
        tracing::info!("declining confirmation {message:?}");
        false
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging()?;

    let args = Args::parse();
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };

    let transport = Arc::new(HttpTransport::new(&ClientConfig::new(&args.api_url))?);
    let state = Arc::new(AppState::new());
    let (app, mut commands) = AppHandle::new(state.clone());
    let app = Arc::new(app);
    let session = Arc::new(UserSession::new(transport.clone(), state.clone()));
    let dialogs = Arc::new(ConsoleDialogs);

    let log_in_form = LogInForm::new(
        mount(log_in_skeleton(&args.email, &password)),
        session.clone(),
        app.clone(),
        dialogs.clone(),
    )?;
    log_in_form.submit().await;

    let Some(user) = state.current_user() else {
        eprintln!("Could not log in as {}", args.email);
        exit(1);
    };
    tracing::info!("logged in as {}", user.name);

    let user_widget = UserWidget::new(mount(user_panel_skeleton()), session.clone())?;
    user_widget.update();
    println!("{}", user_widget.element().outer_html());

    let accounts_widget = AccountsWidget::new(
        mount(sidebar_skeleton()),
        Resource::accounts(transport.clone()),
        session.clone(),
        app.clone(),
        dialogs.clone(),
    )?;
    accounts_widget.update().await;
    println!("{}", accounts_widget.element().outer_html());

    if let Some(account_id) = args.account_id {
        let page = TransactionsPage::new(
            mount(page_skeleton()),
            Resource::accounts(transport.clone()),
            Resource::transactions(transport.clone()),
            app.clone(),
            dialogs.clone(),
        )?;
        page.render(Some(PageOptions { account_id })).await;
        println!("{}", page.element().outer_html());
    }

    while let Ok(command) = commands.try_recv() {
        tracing::debug!("ignoring {command:?}");
    }

    Ok(())
}

fn mount(skeleton: Markup) -> Option<Element> {
    Element::parse(&skeleton.into_string())
}

fn log_in_skeleton(email: &str, password: &str) -> Markup {
    html! {
        form class="form" id="login-form"
        {
            input type="email" name="email" value=(email);
            input type="password" name="password" value=(password);
        }
    }
}

fn user_panel_skeleton() -> Markup {
    html! {
        div class="user-panel"
        {
            p class="user-name" {}
        }
    }
}

fn sidebar_skeleton() -> Markup {
    html! {
        ul class="sidebar-menu accounts-panel"
        {
            li class="header"
            {
                "Счета "
                a href="#" class="create-account" { span class="label label-success" { "+" } }
            }
        }
    }
}

fn page_skeleton() -> Markup {
    html! {
        section class="content-wrapper"
        {
            section class="content-header"
            {
                h1 class="content-title" { "Название счёта" }
                button class="btn btn-danger remove-account" { "Удалить счёт" }
            }
            section class="content" {}
        }
    }
}

fn setup_logging() -> io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}
