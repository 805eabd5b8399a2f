// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TCG Marketplace command-line client
//!
//! Signs in against the marketplace API, keeps the session on disk, and
//! exposes the listing and feed endpoints.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tcg_marketplace::{
    config::Config,
    forms::{registration_failure_message, ListingForm, RegistrationForm, SignInForm},
    models::{Hit, Listing, ListingQuery, ListingType},
    services::feed,
    session::{redirect_for, RouteTree},
    time_utils::time_ago_rfc3339,
    AppContext,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tcg-marketplace", version, about = "Buy, sell and trade trading cards")]
struct Cli {
    /// Override API_BASE_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the restored session and the active screen tree
    Status,
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TCG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    SignUp {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        user_name: String,
        #[arg(long, env = "TCG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Sign out and forget the stored session
    SignOut,
    /// Fetch the signed-in user from the server
    Whoami,
    /// List card game categories
    Categories,
    /// List marketplace listings
    Listings {
        #[arg(long = "type", value_enum)]
        listing_type: Option<Kind>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show the hits feed, optionally filtered by title
    Feed {
        #[arg(long)]
        search: Option<String>,
    },
    /// Post a new listing
    PostListing {
        #[arg(long = "type", value_enum)]
        listing_type: Kind,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        price: String,
        #[arg(long, default_value = "Any")]
        condition: String,
        #[arg(long, default_value = "pokemon")]
        category: String,
        #[arg(long, default_value = "base1")]
        card_set: String,
    },
    /// Like a feed entry
    Like { hit_id: u64 },
    /// Remove your like from a feed entry
    Unlike { hit_id: u64 },
    /// Show comments on a listing
    Comments { listing_id: u64 },
    /// Comment on a feed entry
    Comment { hit_id: u64, text: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Selling,
    Looking,
}

impl From<Kind> for ListingType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Selling => ListingType::Selling,
            Kind::Looking => ListingType::Looking,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_base_url(url)?;
    }
    tracing::debug!(api = %config.api_base_url, storage = %config.storage_path.display(), "Starting");

    let ctx = AppContext::new(config)?;
    let mut guard = ctx.guard();
    ctx.session.restore().await;
    let tree = guard.ready().await;

    match cli.command {
        Command::Status => {
            match ctx.session.user() {
                Some(user) => println!("Signed in as {} <{}>", user.display_name(), user.email),
                None => println!("Not signed in"),
            }
            println!("Screens: {:?}", tree);
        }
        Command::SignIn { email, password } => {
            if let Some(route) = redirect_for(&ctx.session.state()) {
                println!("Already signed in, go to {}", route);
                return Ok(());
            }
            let form = SignInForm { email, password };
            form.check()?;
            let route = ctx
                .session
                .sign_in(&form.email, &form.password)
                .await
                .map_err(|e| anyhow::anyhow!("Sign in failed: {}", e.message()))?;
            println!("Signed in, go to {}", route);
        }
        Command::SignUp {
            first_name,
            last_name,
            email,
            user_name,
            password,
            confirm_password,
        } => {
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
                user_name,
            };
            form.check()?;
            let route = ctx.session.sign_up(form).await.map_err(|e| {
                anyhow::anyhow!("Registration failed: {}", registration_failure_message(&e))
            })?;
            println!("Account created and signed in, go to {}", route);
        }
        Command::SignOut => {
            let route = ctx.session.sign_out().await;
            println!("Signed out, go to {}", route);
        }
        command => {
            if tree != RouteTree::Main {
                bail!("Not signed in. Run `tcg-marketplace sign-in` first.");
            }
            run_authenticated(&ctx, command).await?;
        }
    }

    Ok(())
}

/// Commands that need a restored session.
async fn run_authenticated(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Whoami => {
            let user = ctx.api.current_user().await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Categories => {
            for category in ctx.api.categories_or_default().await {
                println!("{:<12} {}", category.id, category.name);
            }
        }
        Command::Listings {
            listing_type,
            category,
            page,
        } => {
            let query = ListingQuery {
                listing_type: listing_type.map(Into::into),
                category_id: category,
                page,
                ..ListingQuery::default()
            };
            for listing in ctx.api.listings(&query).await? {
                print_listing(&listing);
            }
        }
        Command::Feed { search } => {
            let hits = ctx.api.hits().await?;
            let shown: Vec<&Hit> = match search.as_deref() {
                Some(q) => feed::search_hits(&hits, q),
                None => hits.iter().collect(),
            };
            for hit in shown {
                print_hit(hit);
            }
        }
        Command::PostListing {
            listing_type,
            title,
            description,
            price,
            condition,
            category,
            card_set,
        } => {
            let form = ListingForm {
                item_title: title,
                description,
                price,
                listing_type: listing_type.into(),
                condition,
                category_id: category,
                card_set_id: card_set,
            };
            form.check()?;
            let listing = ctx.api.create_listing(&form.into_request()).await?;
            println!("Posted listing #{}", listing.id);
        }
        Command::Like { hit_id } => set_liked(ctx, hit_id, true).await?,
        Command::Unlike { hit_id } => set_liked(ctx, hit_id, false).await?,
        Command::Comments { listing_id } => {
            let now = chrono::Utc::now();
            for comment in ctx.api.comments(listing_id).await? {
                println!(
                    "{} ({}): {}",
                    comment.user_name,
                    time_ago_rfc3339(&comment.created_at, now),
                    comment.comment
                );
            }
        }
        Command::Comment { hit_id, text } => {
            let mut hit = find_hit(ctx, hit_id).await?;
            let comment = feed::post_comment(&ctx.api, &mut hit, &text).await?;
            println!(
                "Comment #{} posted ({} comments)",
                comment.id, hit.comments_count
            );
        }
        Command::Status | Command::SignIn { .. } | Command::SignUp { .. } | Command::SignOut => {
            unreachable!("handled before the session check")
        }
    }
    Ok(())
}

async fn set_liked(ctx: &AppContext, hit_id: u64, like: bool) -> anyhow::Result<()> {
    let mut hit = find_hit(ctx, hit_id).await?;
    if hit.is_liked != like {
        feed::toggle_like(&ctx.api, &mut hit).await?;
    }
    println!(
        "{} #{} ({} likes)",
        if hit.is_liked { "Liked" } else { "Not liked" },
        hit.id,
        hit.likes_count
    );
    Ok(())
}

async fn find_hit(ctx: &AppContext, hit_id: u64) -> anyhow::Result<Hit> {
    ctx.api
        .hits()
        .await?
        .into_iter()
        .find(|h| h.id == hit_id)
        .with_context(|| format!("No feed entry #{}", hit_id))
}

fn print_listing(listing: &Listing) {
    println!(
        "#{:<6} {:<8} {:<40} ${:>9} {}",
        listing.id,
        listing.listing_type.as_str(),
        listing.item_title,
        listing.price,
        listing.condition
    );
}

fn print_hit(hit: &Hit) {
    let now = chrono::Utc::now();
    println!(
        "#{:<6} {:<40} ${:>9}  @{} {}  ♥ {}  💬 {}{}",
        hit.id,
        hit.item_title,
        hit.price,
        hit.user_name,
        time_ago_rfc3339(&hit.created_at, now),
        hit.likes_count,
        hit.comments_count,
        if hit.is_liked { " (liked)" } else { "" }
    );
}

/// Initialize logging to stderr. `LOG_FORMAT=json` selects structured JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tcg_marketplace=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
