use clap::{Parser, Subcommand, ValueEnum};
use coursecart::application::cart_store::CartStore;
use coursecart::application::checkout::CheckoutFlow;
use coursecart::application::watcher::{PaymentWatcher, WatcherState};
use coursecart::config;
use coursecart::domain::cart::{Money, NewCartItem, ProductKind};
use coursecart::domain::checkout::{CreditCard, Customer, PaymentMethod, installment_options};
use coursecart::domain::payment::{PaymentResult, PaymentStatus};
use coursecart::domain::ports::{CartStorageBox, SharedPaymentGateway};
use coursecart::infrastructure::file::FileStorage;
#[cfg(feature = "storage-rocksdb")]
use coursecart::infrastructure::rocksdb::RocksDbStorage;
use coursecart::interfaces::http::gateway::ApiGateway;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the persisted cart. Defaults to the platform data dir.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the storefront API.
    #[arg(long, global = true, default_value = config::DEFAULT_API_BASE)]
    api_url: String,

    /// Use a RocksDB database at this path instead of plain files.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Course,
    Ebook,
    Paper,
}

impl From<KindArg> for ProductKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Course => ProductKind::Course,
            KindArg::Ebook => ProductKind::Ebook,
            KindArg::Paper => ProductKind::Paper,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    CreditCard,
    Pix,
    Boleto,
}

impl From<MethodArg> for PaymentMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::CreditCard => PaymentMethod::CreditCard,
            MethodArg::Pix => PaymentMethod::Pix,
            MethodArg::Boleto => PaymentMethod::Boleto,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Add a product to the cart (or bump its quantity).
    Add {
        /// Product id.
        id: String,
        #[arg(long)]
        title: String,
        /// Price in cents.
        #[arg(long)]
        price: u64,
        #[arg(long, value_enum, default_value = "course")]
        kind: KindArg,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a product from the cart.
    Remove { id: String },
    /// Set the quantity of a cart line (0 removes it).
    SetQuantity { id: String, quantity: u32 },
    /// Show the cart.
    List,
    /// Empty the cart.
    Clear,
    /// Run the checkout wizard against the API.
    Checkout {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        tax_id: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, value_enum)]
        method: MethodArg,
        #[arg(long)]
        card_holder: Option<String>,
        #[arg(long)]
        card_number: Option<String>,
        #[arg(long)]
        card_expiry_month: Option<String>,
        #[arg(long)]
        card_expiry_year: Option<String>,
        #[arg(long)]
        card_ccv: Option<String>,
        #[arg(long, default_value_t = 1)]
        installments: u32,
        /// Print the payment data and exit without polling for confirmation.
        #[arg(long)]
        no_watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let storage = open_storage(&cli)?;
    let cart = Arc::new(Mutex::new(CartStore::load(storage)));

    match cli.command {
        Command::Add {
            id,
            title,
            price,
            kind,
            quantity,
            description,
        } => {
            let mut cart = lock(&cart);
            cart.add_item(
                NewCartItem {
                    id,
                    title,
                    description,
                    price: Money(price),
                    kind: kind.into(),
                    thumbnail_url: None,
                },
                quantity,
            );
            println!("{} item(s) in cart, subtotal {}", cart.count(), cart.subtotal());
        }
        Command::Remove { id } => {
            let mut cart = lock(&cart);
            cart.remove_item(&id);
            println!("{} item(s) in cart, subtotal {}", cart.count(), cart.subtotal());
        }
        Command::SetQuantity { id, quantity } => {
            let mut cart = lock(&cart);
            cart.set_quantity(&id, quantity);
            println!("{} item(s) in cart, subtotal {}", cart.count(), cart.subtotal());
        }
        Command::List => {
            let cart = lock(&cart);
            if cart.items().is_empty() {
                println!("cart is empty");
            } else {
                for item in cart.items() {
                    println!(
                        "{}  {}x {} ({})",
                        item.id, item.quantity, item.title, item.price
                    );
                }
                println!("total: {} ({} items)", cart.total(), cart.count());
            }
        }
        Command::Clear => {
            lock(&cart).clear();
            println!("cart cleared");
        }
        Command::Checkout {
            name,
            email,
            tax_id,
            phone,
            method,
            card_holder,
            card_number,
            card_expiry_month,
            card_expiry_year,
            card_ccv,
            installments,
            no_watch,
        } => {
            let gateway: SharedPaymentGateway =
                Arc::new(ApiGateway::new(&cli.api_url).into_diagnostic()?);
            let mut flow = CheckoutFlow::new(Arc::clone(&gateway));

            flow.submit_customer(Customer {
                name,
                email,
                tax_id,
                phone,
            })
            .into_diagnostic()?;

            let method = PaymentMethod::from(method);
            flow.select_method(method);
            if method == PaymentMethod::CreditCard {
                flow.set_credit_card(CreditCard {
                    holder_name: card_holder.unwrap_or_default(),
                    number: card_number.unwrap_or_default(),
                    expiry_month: card_expiry_month.unwrap_or_default(),
                    expiry_year: card_expiry_year.unwrap_or_default(),
                    ccv: card_ccv.unwrap_or_default(),
                });
                flow.set_installments(installments).into_diagnostic()?;

                let total = lock(&cart).total();
                if let Some(plan) = installment_options(total)
                    .into_iter()
                    .find(|p| p.installments == installments)
                {
                    println!("paying {} x {}", plan.installments, plan.amount);
                }
            }

            let result = {
                let mut cart = lock(&cart);
                flow.submit_payment(&mut cart).await.into_diagnostic()?.clone()
            };

            match &result {
                PaymentResult::CreditCard { order_id, status } => match status {
                    PaymentStatus::Confirmed => {
                        println!("payment confirmed, order {order_id}");
                    }
                    status => {
                        println!("payment not confirmed, order {order_id}: {status:?}");
                    }
                },
                PaymentResult::Pix {
                    order_id,
                    payload,
                    expiration_date,
                    ..
                } => {
                    println!("PIX copy-and-paste code (expires {expiration_date}):");
                    println!("{payload}");
                    if !no_watch {
                        watch_until_confirmed(&cart, gateway, order_id.clone()).await;
                    }
                }
                PaymentResult::Boleto {
                    order_id,
                    url,
                    barcode,
                } => {
                    println!("boleto: {url}");
                    println!("barcode: {barcode}");
                    if !no_watch {
                        watch_until_confirmed(&cart, gateway, order_id.clone()).await;
                    }
                }
            }
        }
    }

    Ok(())
}

fn open_storage(cli: &Cli) -> Result<CartStorageBox> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = &cli.db_path {
        return Ok(Box::new(RocksDbStorage::open(db_path).into_diagnostic()?));
    }

    let dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(config::default_data_dir);
    Ok(Box::new(FileStorage::open(dir).into_diagnostic()?))
}

fn lock(cart: &Arc<Mutex<CartStore>>) -> std::sync::MutexGuard<'_, CartStore> {
    cart.lock().unwrap_or_else(|e| e.into_inner())
}

/// Polls the order until the backend confirms it, clearing the cart once.
async fn watch_until_confirmed(
    cart: &Arc<Mutex<CartStore>>,
    gateway: SharedPaymentGateway,
    order_id: String,
) {
    let cart_on_confirm = Arc::clone(cart);
    let mut watcher = PaymentWatcher::spawn(
        gateway,
        order_id,
        config::POLL_INTERVAL,
        move || {
            cart_on_confirm
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clear();
        },
    );

    println!("waiting for payment confirmation (ctrl-c to stop)...");
    if watcher.wait_terminal().await == WatcherState::Confirmed {
        println!("payment confirmed");
    }
}
