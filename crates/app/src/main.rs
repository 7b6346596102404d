//! Souk Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use souk::{coupons::CouponKind, money::Amount};
use souk_app::{
    context::AppContext,
    domain::{
        catalog::{
            CatalogService,
            models::{NewProduct, ProductUuid},
        },
        coupons::{
            CouponsService,
            models::{CouponUuid, NewCoupon},
        },
        settings::{SettingsService, models::SettingsUpdate},
    },
};

#[derive(Debug, Parser)]
#[command(name = "souk-app", about = "Souk CLI", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Product(ProductCommand),
    Coupon(CouponCommand),
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    Create(CreateProductArgs),
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    /// Price in minor units
    #[arg(long)]
    price: u64,

    /// Discounted price in minor units; applies only when below the price
    #[arg(long)]
    discounted_price: Option<u64>,

    /// Initial stock
    #[arg(long, default_value_t = 0)]
    stock: u64,
}

#[derive(Debug, Args)]
struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    Create(CreateCouponArgs),
}

#[derive(Debug, Args)]
struct CreateCouponArgs {
    /// Coupon code; stored upper-cased
    #[arg(long)]
    code: String,

    /// Discount kind: percent or fixed
    #[arg(long)]
    kind: String,

    /// Percentage (1-100) for percent coupons, minor units for fixed ones
    #[arg(long)]
    value: u64,

    /// Minimum subtotal in minor units
    #[arg(long)]
    min_subtotal: Option<u64>,

    /// Maximum number of redemptions
    #[arg(long)]
    usage_limit: Option<u32>,
}

#[derive(Debug, Args)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    Show,
    Set(SetSettingsArgs),
}

#[derive(Debug, Args)]
struct SetSettingsArgs {
    /// Standard shipping price in minor units
    #[arg(long)]
    shipping_standard: u64,

    /// Express shipping price in minor units
    #[arg(long)]
    shipping_express: u64,

    /// Subtotal in minor units at or above which shipping is free
    #[arg(long)]
    free_shipping_min: Option<u64>,

    /// Tax percentage on a 0-100 scale
    #[arg(long)]
    tax_percent: Option<Decimal>,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let database_url = cli
        .database_url
        .ok_or_else(|| "DATABASE_URL is not set".to_string())?;

    let ctx = AppContext::from_database_url(&database_url)
        .await
        .map_err(|error| format!("failed to initialize: {error}"))?;

    match cli.command {
        Commands::Product(ProductCommand {
            command: ProductSubcommand::Create(args),
        }) => create_product(&ctx, args).await,
        Commands::Coupon(CouponCommand {
            command: CouponSubcommand::Create(args),
        }) => create_coupon(&ctx, args).await,
        Commands::Settings(SettingsCommand {
            command: SettingsSubcommand::Show,
        }) => show_settings(&ctx).await,
        Commands::Settings(SettingsCommand {
            command: SettingsSubcommand::Set(args),
        }) => set_settings(&ctx, args).await,
    }
}

async fn create_product(ctx: &AppContext, args: CreateProductArgs) -> Result<(), String> {
    let price = Amount::from_minor(args.price);
    let discounted = args.discounted_price.map_or(price, Amount::from_minor);

    let product = ctx
        .catalog
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: args.name,
            original_price: price,
            discounted_price: discounted,
            stock: args.stock,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("effective_price: {}", product.effective_price());
    println!("stock: {}", product.stock);

    Ok(())
}

async fn create_coupon(ctx: &AppContext, args: CreateCouponArgs) -> Result<(), String> {
    let kind = match args.kind.to_lowercase().as_str() {
        "percent" => CouponKind::Percent,
        "fixed" => CouponKind::Fixed,
        other => return Err(format!("unknown coupon kind: {other}")),
    };

    let coupon = ctx
        .coupons
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            kind,
            value: args.value,
            min_subtotal: args.min_subtotal.map(Amount::from_minor),
            usage_limit: args.usage_limit,
            starts_at: None,
            ends_at: None,
            active: true,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);

    Ok(())
}

async fn show_settings(ctx: &AppContext) -> Result<(), String> {
    let settings = ctx
        .settings
        .get_settings()
        .await
        .map_err(|error| format!("failed to load settings: {error}"))?;

    let rendered = serde_json::to_string_pretty(&settings)
        .map_err(|error| format!("failed to render settings: {error}"))?;

    println!("{rendered}");

    Ok(())
}

async fn set_settings(ctx: &AppContext, args: SetSettingsArgs) -> Result<(), String> {
    ctx.settings
        .update_settings(SettingsUpdate {
            shipping_standard: Amount::from_minor(args.shipping_standard),
            shipping_express: Amount::from_minor(args.shipping_express),
            free_shipping_min: args.free_shipping_min.map(Amount::from_minor),
            tax_percent: args.tax_percent,
        })
        .await
        .map_err(|error| format!("failed to update settings: {error}"))?;

    show_settings(ctx).await
}
