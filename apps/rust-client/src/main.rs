// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sphere_client::{
    config::{ClientConfig, WalletKeySource, LOG_FORMAT_ENV},
    market::{MarketplaceView, NftDetailView, UploadFile, UploadFlow, UploadForm},
    models::{Nft, NftFilter},
    state::AppState,
    storage::{FileTokenStore, StoragePaths},
    store::WalletSession,
    wallet::{ConnectOutcome, LocalWallet, WalletConnector, WalletProvider},
};

/// Sphere marketplace client
#[derive(Parser)]
#[command(name = "sphere-client")]
#[command(about = "Command-line client for the Sphere NFT marketplace", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with the configured wallet key
    Connect,
    /// Forget the stored session token
    Disconnect,
    /// Browse the marketplace
    Market {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// List NFTs owned by the signed-in wallet
    Mine,
    /// Show one NFT
    Nft { id: u64 },
    /// Mint an uploaded NFT
    Mint { id: u64 },
    /// List a minted NFT for sale
    List {
        id: u64,
        /// Price in SPH
        price: String,
    },
    /// Buy a listed NFT
    Buy { id: u64 },
    /// Upload artwork
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Show the SPH token price
    Price,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn load_wallet(
    config: &ClientConfig,
) -> Result<Option<Arc<dyn WalletProvider>>, Box<dyn Error>> {
    let chain_id = config.network.chain_id;
    let wallet = match &config.wallet_key {
        Some(WalletKeySource::Hex(key)) => LocalWallet::from_hex(key, chain_id)?,
        Some(WalletKeySource::PemFile(path)) => {
            let pem = tokio::fs::read(path).await?;
            LocalWallet::from_pem(&pem, chain_id)?
        }
        None => return Ok(None),
    };
    let wallet = if config.verify_chain_rpc {
        wallet.with_rpc_verification()
    } else {
        wallet
    };
    Ok(Some(Arc::new(wallet)))
}

/// Run the handshake; registration is not handled from the terminal.
async fn sign_in(connector: &WalletConnector) -> Result<WalletSession, Box<dyn Error>> {
    match connector.connect().await? {
        ConnectOutcome::Connected(session) => Ok(session),
        ConnectOutcome::RegistrationRequired(handshake) => Err(format!(
            "address {} is not registered; complete registration first",
            handshake.address
        )
        .into()),
    }
}

fn print_nft(nft: &Nft) {
    println!("#{} {} [{}]", nft.id, nft.title, nft.status.label());
    println!("  category: {}", nft.category);
    println!("  owner:    {}", nft.owner_name());
    println!("  creator:  {}", nft.creator_name());
    if let Some(price) = nft.price_label() {
        println!("  price:    {price}");
    }
    if let Some(token_id) = nft.token_id() {
        println!("  token:    {token_id}");
    }
    println!("  image:    {}", nft.image_url);
}

fn show_detail(view: &NftDetailView) {
    if let Some(nft) = view.nft() {
        print_nft(nft);
    }
    if let Some(success) = view.success() {
        println!("{success}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    let tokens = Arc::new(FileTokenStore::new(StoragePaths::new(&config.token_dir)));
    let wallet = load_wallet(&config).await?;
    let state = AppState::new(config, tokens)?;
    let connector = state.connector(wallet);

    info!(api_url = %state.api.base_url(), "Sphere client starting");

    match cli.command {
        Commands::Connect => {
            let session = sign_in(&connector).await?;
            println!(
                "Connected as {} ({})",
                session.short_address(),
                session.user.as_ref().map(|u| u.display_name()).unwrap_or_default()
            );
        }
        Commands::Disconnect => {
            connector.disconnect()?;
            println!("Disconnected");
        }
        Commands::Market {
            page,
            limit,
            category,
            min_price,
            max_price,
        } => {
            let mut view = MarketplaceView::marketplace(&state);
            view.set_filter(NftFilter {
                page,
                limit,
                category,
                min_price,
                max_price,
            });
            view.refresh().await?;
            if let Some(empty) = view.empty_message() {
                println!("{empty}");
            }
            for card in view.cards() {
                let price = card.price_label.unwrap_or_default();
                println!("#{:<6} {:<32} {:<9} {}", card.id, card.title, card.status_label, price);
            }
        }
        Commands::Mine => {
            sign_in(&connector).await?;
            let mut view = MarketplaceView::collection(&state);
            view.refresh().await?;
            if let Some(empty) = view.empty_message() {
                println!("{empty}");
            }
            for nft in view.nfts() {
                print_nft(nft);
            }
        }
        Commands::Nft { id } => {
            let mut view = NftDetailView::new(&state, id);
            view.load().await?;
            show_detail(&view);
        }
        Commands::Mint { id } => {
            sign_in(&connector).await?;
            let mut view = NftDetailView::new(&state, id);
            view.load().await?;
            view.mint().await?;
            show_detail(&view);
        }
        Commands::List { id, price } => {
            sign_in(&connector).await?;
            let mut view = NftDetailView::new(&state, id);
            view.load().await?;
            view.list_for_sale(&price).await?;
            show_detail(&view);
        }
        Commands::Buy { id } => {
            sign_in(&connector).await?;
            let mut view = NftDetailView::new(&state, id);
            view.load().await?;
            view.buy().await?;
            show_detail(&view);
        }
        Commands::Upload {
            title,
            description,
            category,
            file,
        } => {
            sign_in(&connector).await?;
            let form = UploadForm {
                title,
                description,
                category,
                file: Some(UploadFile::from_path(&file).await?),
            };
            let receipt = UploadFlow::new(&state).submit(&form).await?;
            println!("{}", receipt.message);
            println!("View it at {}", receipt.redirect().await);
        }
        Commands::Price => {
            let price = state.api.token_price().await?;
            println!("SPH price: {}", price.price);
        }
    }

    Ok(())
}
