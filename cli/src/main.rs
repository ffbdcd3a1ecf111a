//! Initiatives CLI: command-line client for a running initiatives server

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use initiatives::model::Initiative;
use initiatives::{InitiativeRepository, RemoteRepository};
use reqwest::Url;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "initiatives", version, about = "Initiatives dashboard CLI")]
struct Cli {
    /// Server HTTP URL
    #[arg(long, default_value = "http://localhost:8080", global = true, env = "INITIATIVES_URL")]
    url: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List enhanced initiatives
    List {
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Only customer-visible initiatives
        #[arg(long)]
        public: bool,
        /// recent, impact or alphabetical
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one initiative with its derived metadata
    Show { uid: String },
    /// Submit a new initiative
    Create {
        #[arg(long)]
        uid: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        challenge: String,
        #[arg(long, default_value = "")]
        solution: String,
        #[arg(long, default_value = "")]
        call_to_action: String,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        impact_score: Option<f64>,
    },
    /// List users
    Users,
    /// Get server status
    Status,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let base = cli.url.trim_end_matches('/').to_string();
    let http = reqwest::Client::new();

    let result = match cli.command {
        Commands::List {
            search,
            theme,
            region,
            phase,
            status,
            public,
            sort,
        } => {
            let mut params: Vec<(&str, String)> = [
                ("search", search),
                ("theme", theme),
                ("region", region),
                ("phase", phase),
                ("status", status),
                ("sort", sort),
            ]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
            if public {
                params.push(("public", "true".to_string()));
            }
            run_list(&http, &base, &params, &cli.format).await
        }
        Commands::Show { uid } => run_show(&http, &base, &uid, &cli.format).await,
        Commands::Create {
            uid,
            company,
            title,
            challenge,
            solution,
            call_to_action,
            theme,
            region,
            phase,
            impact_score,
        } => {
            let mut initiative = Initiative::new(uid, company, title);
            initiative.challenge = challenge;
            initiative.solution = solution;
            initiative.call_to_action = call_to_action;
            initiative.theme = theme;
            initiative.region = region;
            initiative.phase = phase;
            initiative.impact_score = impact_score;
            run_create(&base, initiative, &cli.format).await
        }
        Commands::Users => run_users(&http, &base, &cli.format).await,
        Commands::Status => run_status(&http, &base, &cli.format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `base` plus path segments, each one percent-encoded
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("cannot use {} as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GET a `{success, message, ...}` envelope, failing on `success: false`
async fn get_envelope(
    http: &reqwest::Client,
    mut url: Url,
    params: &[(&str, String)],
) -> Result<Value, Box<dyn std::error::Error>> {
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    let body: Value = http.get(url).send().await?.json().await?;
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        return Err(message.into());
    }
    Ok(body)
}

fn text(v: &Value) -> String {
    match v {
        Value::Null => "".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn run_list(
    http: &reqwest::Client,
    base: &str,
    params: &[(&str, String)],
    format: &OutputFormat,
) -> CliResult {
    let body = get_envelope(http, endpoint(base, &["api", "initiatives"])?, params).await?;
    let empty = Vec::new();
    let initiatives = body["initiatives"].as_array().unwrap_or(&empty);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(initiatives)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["uid", "title", "company", "theme", "region", "status", "impact", "progress"]);
            for i in initiatives {
                table.add_row(vec![
                    text(&i["uid"]),
                    text(&i["title"]),
                    text(&i["company"]),
                    text(&i["theme"]),
                    text(&i["region"]),
                    text(&i["status"]),
                    text(&i["impactScore"]),
                    format!("{}%", text(&i["progress"])),
                ]);
            }
            println!("{}", table);
            println!("{}", text(&body["message"]));
        }
    }
    Ok(())
}

async fn run_show(
    http: &reqwest::Client,
    base: &str,
    uid: &str,
    format: &OutputFormat,
) -> CliResult {
    let body = get_envelope(http, endpoint(base, &["api", "initiatives", uid])?, &[]).await?;
    let i = &body["initiative"];

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(i)?),
        OutputFormat::Table => {
            println!("{} ({})", text(&i["title"]), text(&i["uid"]));
            println!("Company:  {}", text(&i["company"]));
            println!("Status:   {} ({}%)", text(&i["status"]), text(&i["progress"]));
            println!(
                "Budget:   {} / {} {}",
                text(&i["budget"]["spent"]),
                text(&i["budget"]["allocated"]),
                text(&i["budget"]["currency"])
            );

            let mut table = Table::new();
            table.set_header(vec!["milestone", "due", "done"]);
            for m in i["milestones"].as_array().into_iter().flatten() {
                table.add_row(vec![text(&m["title"]), text(&m["dueDate"]), text(&m["completed"])]);
            }
            println!("{}", table);

            let team: Vec<String> = i["teamMembers"]
                .as_array()
                .into_iter()
                .flatten()
                .map(|m| format!("{} ({})", text(&m["name"]), text(&m["role"])))
                .collect();
            println!("Team:     {}", team.join(", "));
        }
    }
    Ok(())
}

async fn run_create(base: &str, initiative: Initiative, format: &OutputFormat) -> CliResult {
    let repository = RemoteRepository::new(base);
    let created = repository.append(initiative).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&created)?),
        OutputFormat::Table => println!("Created {} ({})", created.title, created.uid),
    }
    Ok(())
}

async fn run_users(http: &reqwest::Client, base: &str, format: &OutputFormat) -> CliResult {
    let body = get_envelope(http, endpoint(base, &["api", "users"])?, &[]).await?;
    let empty = Vec::new();
    let users = body["users"].as_array().unwrap_or(&empty);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(users)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["id", "name", "email", "points"]);
            for u in users {
                table.add_row(vec![
                    text(&u["id"]),
                    text(&u["name"]),
                    text(&u["email"]),
                    text(&u["points"]),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

async fn run_status(http: &reqwest::Client, base: &str, format: &OutputFormat) -> CliResult {
    let body = get_envelope(http, endpoint(base, &["api", "status"])?, &[]).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
        OutputFormat::Table => {
            println!("Status:        {}", text(&body["status"]));
            println!("Version:       {}", text(&body["version"]));
            println!("Initiatives:   {}", text(&body["storage"]["initiatives"]));
            println!("Users:         {}", text(&body["storage"]["users"]));
            println!("Unread notes:  {}", text(&body["storage"]["unreadNotifications"]));
        }
    }
    Ok(())
}
