use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cliniq_vault::assistant::Assistant;
use cliniq_vault::chat;
use cliniq_vault::settings;
use cliniq_vault::{AccessGate, Database, Department, DepartmentKeys, Document, SharedKeyGate, User, Vault};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cliniq", version, about = "Department-scoped clinical knowledge assistant")]
struct Cli {
    /// Directory holding the vault database
    #[arg(long, env = "CLINIQ_DATA_DIR", default_value = ".cliniq", value_name = "DIR", global = true)]
    data_dir: PathBuf,
    #[command(flatten)]
    login: Login,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Login {
    /// Radiology, Oncology, Pathology or Administration
    #[arg(long, short = 'd', env = "CLINIQ_DEPARTMENT", global = true)]
    department: Option<Department>,
    /// Display name, recorded as uploader
    #[arg(long = "user", env = "CLINIQ_USER", default_value = "", global = true)]
    name: String,
    /// Department access key
    #[arg(long, env = "CLINIQ_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    password: String,
}

#[derive(Subcommand)]
enum Command {
    /// Manage department documents
    Docs {
        #[command(subcommand)]
        action: DocsCommand,
    },
    /// Ask one question against the department's documents
    Ask {
        /// Provider-qualified model, e.g. gemini/gemini-3-flash-preview
        #[arg(long)]
        model: Option<String>,
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Interactive chat; every reply is saved to the session history
    Chat {
        /// Resume a saved session
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Saved chat sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsCommand,
    },
    /// Department figures
    Overview,
    /// Provider settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Models usable with the current settings
    Models,
}

#[derive(Subcommand)]
enum DocsCommand {
    List,
    Search { query: String },
    Show { id: String },
    /// Register a file; its body is not extracted
    Upload { path: PathBuf },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum SessionsCommand {
    List,
    Show { id: String },
    Rename { id: String, title: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum SettingsCommand {
    List,
    Set { key: String, value: String },
    Unset { key: String },
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "cliniq_vault=info,cliniq=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let db = Database::new(&cli.data_dir)
        .with_context(|| format!("opening vault in {}", cli.data_dir.display()))?;

    match &cli.command {
        Command::Settings { action } => return run_settings(&db, action),
        Command::Models => {
            for m in settings::available_models(&db) {
                println!("{:<40} {} ({})", m.id, m.name, m.provider);
            }
            return Ok(());
        }
        _ => {}
    }

    let gate = SharedKeyGate::new(DepartmentKeys::from_env());
    let user = gate.authenticate(cli.login.department, &cli.login.password, &cli.login.name)?;

    let model_arg = match &cli.command {
        Command::Ask { model, .. } | Command::Chat { model, .. } => model.clone(),
        _ => None,
    };
    let mut vault = Vault::open(db).context("loading stored documents and sessions")?;

    match cli.command {
        Command::Docs { action } => run_docs(&mut vault, &user, action),
        Command::Ask { query, .. } => {
            let provider = settings::resolve_provider(model_arg.as_deref(), vault.store())?;
            let assistant = Assistant::new(provider);
            let query = query.join(" ");
            let reply = assistant
                .ask_or_apologize(&query, user.department, vault.documents().all())
                .await;
            println!("{}", reply);
            Ok(())
        }
        Command::Chat { session, .. } => {
            let provider = settings::resolve_provider(model_arg.as_deref(), vault.store())?;
            run_chat(&mut vault, &user, Assistant::new(provider), session).await
        }
        Command::Sessions { action } => run_sessions(&mut vault, &user, action),
        Command::Overview => {
            let overview = vault.overview(user.department);
            println!("Department:     {}", overview.department);
            println!("Signed in as:   {} ({:?})", user.name, user.role);
            println!("Indexed files:  {}", overview.indexed_files);
            println!("Chat sessions:  {}", overview.chat_sessions);
            println!("Messages:       {}", overview.messages);
            println!("Storage distribution:");
            for (dept, count) in overview.distribution {
                println!("  {:<15} {}", dept, count);
            }
            Ok(())
        }
        Command::Settings { .. } | Command::Models => unreachable!("handled before login"),
    }
}

/// Looks up a document the signed-in department may see.
fn own_document<'a>(vault: &'a Vault<Database>, user: &User, id: &str) -> Result<&'a Document> {
    vault
        .get_document(id)
        .filter(|d| d.department == user.department)
        .ok_or_else(|| anyhow!("Document not found: {}", id))
}

fn print_documents(docs: &[&Document]) {
    if docs.is_empty() {
        println!("No documents.");
        return;
    }
    for d in docs {
        println!("{:<38} {:<32} {:>8}  {}", d.id, d.name, d.size, d.uploaded_at);
    }
}

fn run_docs(vault: &mut Vault<Database>, user: &User, action: DocsCommand) -> Result<()> {
    match action {
        DocsCommand::List => print_documents(&vault.list_documents(user.department)),
        DocsCommand::Search { query } => {
            print_documents(&vault.search_documents(user.department, &query))
        }
        DocsCommand::Show { id } => {
            let d = own_document(vault, user, &id)?;
            println!("{} ({}, uploaded by {} on {})", d.name, d.size, d.uploaded_by, d.uploaded_at);
            println!();
            println!("{}", d.content);
        }
        DocsCommand::Upload { path } => {
            let doc = vault
                .upload_document(&path, user)
                .with_context(|| format!("uploading {}", path.display()))?;
            println!("Uploaded {} as {}", doc.name, doc.id);
        }
        DocsCommand::Edit { id, name, content } => {
            let current = own_document(vault, user, &id)?;
            let name = name.unwrap_or_else(|| current.name.clone());
            let content = content.unwrap_or_else(|| current.content.clone());
            vault.update_document(&id, &name, &content)?;
            println!("Updated {}", id);
        }
        DocsCommand::Delete { id } => {
            own_document(vault, user, &id)?;
            vault.delete_document(&id)?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

fn owns_session(vault: &Vault<Database>, user: &User, id: &str) -> bool {
    vault
        .get_session(id)
        .is_some_and(|s| s.department == user.department)
}

fn run_sessions(vault: &mut Vault<Database>, user: &User, action: SessionsCommand) -> Result<()> {
    match action {
        SessionsCommand::List => {
            let sessions = vault.list_sessions(user.department);
            if sessions.is_empty() {
                println!("No conversation history.");
            }
            for s in sessions {
                println!("{:<38} {:<34} {} messages", s.id, s.title, s.messages.len());
            }
        }
        SessionsCommand::Show { id } => {
            if !owns_session(vault, user, &id) {
                bail!("Chat session not found: {}", id);
            }
            if let Some(session) = vault.get_session(&id) {
                println!("# {}", session.title);
                for m in &session.messages {
                    println!("[{}] {:?}: {}", m.timestamp, m.role, m.text);
                }
            }
        }
        SessionsCommand::Rename { id, title } => {
            if !owns_session(vault, user, &id) {
                bail!("Chat session not found: {}", id);
            }
            vault.rename_session(&id, &title)?;
        }
        SessionsCommand::Delete { id } => {
            if !owns_session(vault, user, &id) {
                bail!("Chat session not found: {}", id);
            }
            vault.delete_session(&id)?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

async fn run_chat<G: cliniq_vault::llm::TextGenerator>(
    vault: &mut Vault<Database>,
    user: &User,
    assistant: Assistant<G>,
    resume: Option<String>,
) -> Result<()> {
    let (mut current, mut transcript) = match resume {
        Some(id) => {
            let session = vault
                .get_session(&id)
                .filter(|s| s.department == user.department)
                .ok_or_else(|| anyhow!("Chat session not found: {}", id))?;
            println!("Resuming \"{}\"", session.title);
            (Some(id), session.messages.clone())
        }
        None => (None, Vec::new()),
    };

    println!(
        "{} knowledge assistant. /new starts a fresh conversation, /quit exits.",
        user.department
    );
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        match query {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                current = None;
                transcript.clear();
                println!("Started a new conversation.");
                continue;
            }
            _ => {}
        }

        let (updated, reply) = chat::send(
            &assistant,
            user.department,
            vault.documents().all(),
            std::mem::take(&mut transcript),
            query,
        )
        .await?;
        transcript = updated;
        println!("{}", reply);

        current = vault.save_session(current.as_deref(), user.department, &transcript)?;
    }
    Ok(())
}

fn run_settings(db: &Database, action: &SettingsCommand) -> Result<()> {
    match action {
        SettingsCommand::List => {
            for (key, value) in settings::list_settings(db)? {
                println!("{} = {}", key, value);
            }
        }
        SettingsCommand::Set { key, value } => settings::set_setting(db, key, value)?,
        SettingsCommand::Unset { key } => settings::delete_setting(db, key)?,
    }
    Ok(())
}
