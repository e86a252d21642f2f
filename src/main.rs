use std::path::{Path, PathBuf};
use std::process::ExitCode;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kriyado_vendor::app::{AppContext, AppError};
use kriyado_vendor::config::{ConfigError, PortalConfig};
use kriyado_vendor::flows::FlowError;
use kriyado_vendor::flows::branches::{BRANCH_ADDED, BRANCH_DELETED, BRANCH_UPDATED, BranchFlow, BranchForm};
use kriyado_vendor::flows::declaration::{DECLARATION_TEXT, DeclarationFlow};
use kriyado_vendor::flows::discounts::{DISCOUNT_ADDED, DiscountDraft, DiscountFlow, PRESETS};
use kriyado_vendor::flows::login::{LoginError, LoginFlow, LoginForm, LoginOutcome};
use kriyado_vendor::flows::profile::{PROFILE_SAVED, ProfileFlow, ProfileForm};
use kriyado_vendor::flows::signup::{SignupError, SignupFlow, SignupForm};
use kriyado_vendor::flows::wizard::{OnboardingWizard, VendorForm, WizardProgress};
use kriyado_vendor::gate::{Route, RouteOutcome, guard};
use kriyado_vendor::identity::{FederatedCredential, FederatedPrompt};
use kriyado_vendor::net::ApiError;
use kriyado_vendor::net::types::{BusinessType, DiscountKind, DiscountValueType, Upload};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Signup(#[from] SignupError),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no vendor account for {email}; run `kriyado-vendor signup` to create one")]
    SignupRequired { email: String },
    #[error("unknown preset {0}; run `kriyado-vendor discount presets`")]
    UnknownPreset(usize),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "kriyado-vendor", about = "Kriyado vendor portal CLI")]
struct Cli {
    #[arg(long, env = "VENDOR_API_BASE_URL")]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with email and password, or with a federated provider token.
    Login(LoginArgs),
    /// Create an account and sign in.
    Signup(SignupArgs),
    Logout,
    /// Show the current session.
    Status,
    /// Resolve a portal path through the onboarding gate.
    Route { path: String },
    Vendor(VendorCommand),
    Branch(BranchCommand),
    Discount(DiscountCommand),
    Declaration(DeclarationCommand),
    /// Run the three onboarding steps in order.
    Onboard(OnboardArgs),
    Lookup(LookupCommand),
}

#[derive(Args, Debug)]
struct ProviderArgs {
    /// Federated provider id, e.g. `google.com`.
    #[arg(long)]
    provider: Option<String>,
    #[arg(long, env = "VENDOR_PROVIDER_ID_TOKEN")]
    provider_id_token: Option<String>,
    #[arg(long, env = "VENDOR_PROVIDER_ACCESS_TOKEN")]
    provider_access_token: Option<String>,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long, required_unless_present = "provider")]
    email: Option<String>,
    #[arg(long, env = "VENDOR_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[command(flatten)]
    provider: ProviderArgs,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long, required_unless_present = "provider")]
    email: Option<String>,
    #[arg(long, env = "VENDOR_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Defaults to `--password`.
    #[arg(long)]
    confirm_password: Option<String>,
    #[command(flatten)]
    provider: ProviderArgs,
}

#[derive(Args, Debug)]
struct VendorCommand {
    #[command(subcommand)]
    command: VendorSubcommand,
}

#[derive(Subcommand, Debug)]
enum VendorSubcommand {
    Show,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact_number: String,
        /// Shop type id, see `lookup shop-types`.
        #[arg(long)]
        shop_type: String,
        #[arg(long, value_enum)]
        business_type: CliBusinessType,
        #[arg(long, default_value = "")]
        owner_name: String,
    },
    /// Edit the profile; omitted flags keep their current value.
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        owner_name: Option<String>,
        #[arg(long)]
        contact_number: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        facebook: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        youtube: Option<String>,
    },
    Verification,
}

#[derive(Args, Debug)]
struct BranchCommand {
    #[command(subcommand)]
    command: BranchSubcommand,
}

#[derive(Args, Debug)]
struct BranchFields {
    #[arg(long)]
    country: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    district: String,
    #[arg(long)]
    shop_locality: String,
    #[arg(long)]
    nearby_town: String,
    #[arg(long)]
    pin_code: String,
    #[arg(long)]
    key_person_name: String,
    #[arg(long)]
    key_person_contact_number: String,
    #[arg(long, default_value = "")]
    land_phone: String,
    #[arg(long, default_value = "")]
    latitude: String,
    #[arg(long, default_value = "")]
    longitude: String,
}

impl From<BranchFields> for BranchForm {
    fn from(f: BranchFields) -> Self {
        Self {
            country: f.country,
            state: f.state,
            district: f.district,
            shop_locality: f.shop_locality,
            nearby_town: f.nearby_town,
            pin_code: f.pin_code,
            key_person_name: f.key_person_name,
            key_person_contact_number: f.key_person_contact_number,
            land_phone: f.land_phone,
            latitude: f.latitude,
            longitude: f.longitude,
        }
    }
}

#[derive(Subcommand, Debug)]
enum BranchSubcommand {
    List,
    Add(BranchFields),
    Edit {
        id: String,
        #[command(flatten)]
        fields: BranchFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct DiscountCommand {
    #[command(subcommand)]
    command: DiscountSubcommand,
}

#[derive(Subcommand, Debug)]
enum DiscountSubcommand {
    List,
    Presets,
    Add {
        #[arg(long, value_enum, default_value = "total-bill")]
        kind: CliDiscountKind,
        /// Index from `discount presets`; overrides value type and value.
        #[arg(long)]
        preset: Option<usize>,
        #[arg(long, value_enum, default_value = "flat")]
        value_type: CliValueType,
        #[arg(long, default_value = "")]
        value: String,
        /// Branch id; repeat for several branches.
        #[arg(long = "branch")]
        branches: Vec<String>,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        expiry_date: String,
    },
    Enable {
        id: String,
    },
    Disable {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct DeclarationCommand {
    #[command(subcommand)]
    command: DeclarationSubcommand,
}

#[derive(Subcommand, Debug)]
enum DeclarationSubcommand {
    Show,
    /// Print the declaration text.
    Text,
    Sign {
        #[arg(long, default_value_t = false)]
        agree: bool,
    },
}

#[derive(Args, Debug)]
struct OnboardArgs {
    #[command(flatten)]
    location: OnboardLocation,
    #[arg(long)]
    registered_address: String,
    #[arg(long, default_value = "")]
    website: String,
    #[arg(long, default_value = "")]
    facebook_link: String,
    #[arg(long, default_value = "")]
    instagram_link: String,
    #[arg(long, default_value = "")]
    google_map_link: String,
    #[arg(long, default_value = "")]
    youtube_link: String,
    #[arg(long)]
    working_hours_from: String,
    #[arg(long)]
    working_hours_to: String,
    #[arg(long, default_value_t = false)]
    home_delivery: bool,
    #[arg(long)]
    logo: Option<PathBuf>,
    #[arg(long)]
    store_photo: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OnboardLocation {
    #[arg(long)]
    country: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    district: String,
    #[arg(long)]
    shop_locality: String,
    #[arg(long)]
    nearby_town: String,
    #[arg(long)]
    pin_code: String,
    #[arg(long)]
    key_person_name: String,
    #[arg(long)]
    key_person_contact_number: String,
    #[arg(long, default_value = "")]
    land_phone: String,
}

#[derive(Args, Debug)]
struct LookupCommand {
    #[command(subcommand)]
    command: LookupSubcommand,
}

#[derive(Subcommand, Debug)]
enum LookupSubcommand {
    ShopTypes,
    Countries,
    States { country_id: String },
    Districts { state_id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliBusinessType {
    Wholesale,
    Retail,
    WholesaleAndRetail,
    ServiceBased,
}

impl From<CliBusinessType> for BusinessType {
    fn from(value: CliBusinessType) -> Self {
        match value {
            CliBusinessType::Wholesale => Self::Wholesale,
            CliBusinessType::Retail => Self::Retail,
            CliBusinessType::WholesaleAndRetail => Self::WholesaleAndRetail,
            CliBusinessType::ServiceBased => Self::ServiceBased,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliDiscountKind {
    TotalBill,
    CategoryBased,
    SpecialOffer,
}

impl From<CliDiscountKind> for DiscountKind {
    fn from(value: CliDiscountKind) -> Self {
        match value {
            CliDiscountKind::TotalBill => Self::TotalBill,
            CliDiscountKind::CategoryBased => Self::CategoryBased,
            CliDiscountKind::SpecialOffer => Self::SpecialOffer,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliValueType {
    Flat,
    Percentage,
}

impl From<CliValueType> for DiscountValueType {
    fn from(value: CliValueType) -> Self {
        match value {
            CliValueType::Flat => Self::Flat,
            CliValueType::Percentage => Self::Percentage,
        }
    }
}

/// Federated credential supplied up front on the command line.
struct ArgPrompt {
    credential: Option<FederatedCredential>,
}

impl ArgPrompt {
    fn new(args: ProviderArgs) -> Option<Self> {
        let provider_id = args.provider?;
        let credential = (args.provider_id_token.is_some() || args.provider_access_token.is_some()).then(|| {
            FederatedCredential {
                provider_id,
                id_token: args.provider_id_token,
                access_token: args.provider_access_token,
            }
        });
        Some(Self { credential })
    }
}

#[async_trait]
impl FederatedPrompt for ArgPrompt {
    async fn credential(&self) -> Option<FederatedCredential> {
        self.credential.clone()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = PortalConfig::from_env()?;
    if let Some(api_base_url) = cli.api_base_url {
        config.api_base_url = api_base_url;
    }
    let ctx = AppContext::from_config(config)?;

    match cli.command {
        Command::Login(args) => run_login(&ctx, args).await,
        Command::Signup(args) => run_signup(&ctx, args).await,
        Command::Logout => {
            ctx.session.logout();
            println!("logged out");
            Ok(())
        }
        Command::Status => {
            ctx.session.initialize().await;
            print_status(&ctx)
        }
        Command::Route { path } => {
            ctx.session.initialize().await;
            match guard(&ctx.session.snapshot(), Route::parse(&path)) {
                RouteOutcome::Pending => println!("pending"),
                RouteOutcome::Render(route) => println!("render {route}"),
                RouteOutcome::Redirect(route) => println!("redirect {route}"),
            }
            Ok(())
        }
        Command::Vendor(vendor) => {
            ctx.session.initialize().await;
            run_vendor(&ctx, vendor).await
        }
        Command::Branch(branch) => {
            ctx.session.initialize().await;
            run_branch(&ctx, branch).await
        }
        Command::Discount(discount) => {
            ctx.session.initialize().await;
            run_discount(&ctx, discount).await
        }
        Command::Declaration(declaration) => {
            ctx.session.initialize().await;
            run_declaration(&ctx, declaration).await
        }
        Command::Onboard(args) => {
            ctx.session.initialize().await;
            run_onboard(&ctx, args).await
        }
        Command::Lookup(lookup) => run_lookup(&ctx, lookup).await,
    }
}

async fn run_login(ctx: &AppContext, args: LoginArgs) -> Result<(), CliError> {
    let flow = LoginFlow::new(ctx);
    let outcome = match ArgPrompt::new(args.provider) {
        Some(prompt) => flow.with_federated(&prompt).await?,
        None => {
            let form = LoginForm {
                email: args.email.unwrap_or_default(),
                password: args.password.unwrap_or_default(),
            };
            flow.with_password(&form).await?
        }
    };
    match outcome {
        LoginOutcome::Landed(route) => {
            println!("signed in; continue at {route}");
            Ok(())
        }
        LoginOutcome::SignupRequired { email, .. } => Err(CliError::SignupRequired { email }),
    }
}

async fn run_signup(ctx: &AppContext, args: SignupArgs) -> Result<(), CliError> {
    let flow = SignupFlow::new(ctx);
    let route = match ArgPrompt::new(args.provider) {
        Some(prompt) => flow.with_federated(&prompt).await?,
        None => {
            let password = args.password.unwrap_or_default();
            let form = SignupForm {
                email: args.email.unwrap_or_default(),
                confirm_password: args.confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            flow.submit(&form).await?
        }
    };
    println!("account ready; continue at {route}");
    Ok(())
}

fn print_status(ctx: &AppContext) -> Result<(), CliError> {
    let session = ctx.session.snapshot();
    let status = serde_json::json!({
        "phase": format!("{:?}", session.phase()),
        "authenticated": session.is_authenticated(),
        "onboarded": session.is_onboarded(),
        "user": session.user,
        "vendor": session.vendor,
        "onboarding_status": session.onboarding_status,
        "error": session.error,
    });
    print_json(&status)
}

async fn run_vendor(ctx: &AppContext, vendor: VendorCommand) -> Result<(), CliError> {
    match vendor.command {
        VendorSubcommand::Show => print_json(&ctx.session.snapshot().vendor),
        VendorSubcommand::Create {
            name,
            contact_number,
            shop_type,
            business_type,
            owner_name,
        } => {
            let form = VendorForm {
                name,
                contact_number,
                shop_type,
                business_type: Some(business_type.into()),
                owner_name,
            };
            let created = OnboardingWizard::new(ctx).create_vendor(&form).await?;
            print_json(&created)
        }
        VendorSubcommand::Update {
            name,
            owner_name,
            contact_number,
            website,
            facebook,
            instagram,
            youtube,
        } => {
            let current = ctx.session.snapshot().vendor.ok_or(FlowError::NoVendor)?;
            let mut form = ProfileForm::from_vendor(&current);
            let fields = [
                (&mut form.name, name),
                (&mut form.owner_name, owner_name),
                (&mut form.contact_number, contact_number),
                (&mut form.website, website),
                (&mut form.facebook, facebook),
                (&mut form.instagram, instagram),
                (&mut form.youtube, youtube),
            ];
            for (slot, value) in fields {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            ProfileFlow::new(ctx).save(&form).await?;
            println!("{PROFILE_SAVED}");
            Ok(())
        }
        VendorSubcommand::Verification => {
            let status = ProfileFlow::new(ctx).verification_status().await?;
            print_json(&status)
        }
    }
}

async fn run_branch(ctx: &AppContext, branch: BranchCommand) -> Result<(), CliError> {
    let flow = BranchFlow::new(ctx);
    match branch.command {
        BranchSubcommand::List => print_json(&flow.list().await?),
        BranchSubcommand::Add(fields) => {
            let saved = flow.save(&fields.into(), None).await?;
            println!("{BRANCH_ADDED}");
            print_json(&saved)
        }
        BranchSubcommand::Edit { id, fields } => {
            let saved = flow.save(&fields.into(), Some(&id)).await?;
            println!("{BRANCH_UPDATED}");
            print_json(&saved)
        }
        BranchSubcommand::Delete { id } => {
            flow.delete(&id).await?;
            println!("{BRANCH_DELETED}");
            Ok(())
        }
    }
}

async fn run_discount(ctx: &AppContext, discount: DiscountCommand) -> Result<(), CliError> {
    let flow = DiscountFlow::new(ctx);
    match discount.command {
        DiscountSubcommand::List => print_json(&flow.list().await?),
        DiscountSubcommand::Presets => {
            for (index, preset) in PRESETS.iter().enumerate() {
                println!("{index}: {}", preset.label);
            }
            Ok(())
        }
        DiscountSubcommand::Add {
            kind,
            preset,
            value_type,
            value,
            branches,
            category,
            description,
            expiry_date,
        } => {
            let mut draft = DiscountDraft {
                kind: kind.into(),
                value_type: value_type.into(),
                value,
                category,
                description,
                branches: Vec::new(),
                expiry_date,
            };
            if let Some(index) = preset {
                let preset = PRESETS.get(index).ok_or(CliError::UnknownPreset(index))?;
                draft.apply_preset(preset);
            }
            for branch in &branches {
                draft.toggle_branch(branch);
            }
            let created = flow.create(&draft).await?;
            println!("{DISCOUNT_ADDED}");
            print_json(&created)
        }
        DiscountSubcommand::Enable { id } => print_json(&flow.set_active(&id, true).await?),
        DiscountSubcommand::Disable { id } => print_json(&flow.set_active(&id, false).await?),
        DiscountSubcommand::Delete { id } => {
            flow.delete(&id).await?;
            println!("discount deleted");
            Ok(())
        }
    }
}

async fn run_declaration(ctx: &AppContext, declaration: DeclarationCommand) -> Result<(), CliError> {
    let flow = DeclarationFlow::new(ctx);
    match declaration.command {
        DeclarationSubcommand::Show => print_json(&flow.current().await?),
        DeclarationSubcommand::Text => {
            println!("{}", DECLARATION_TEXT.trim());
            Ok(())
        }
        DeclarationSubcommand::Sign { agree } => {
            let route = flow.submit(agree).await?;
            println!("declaration signed; continue at {route}");
            Ok(())
        }
    }
}

async fn run_onboard(ctx: &AppContext, args: OnboardArgs) -> Result<(), CliError> {
    let mut wizard = OnboardingWizard::new(ctx);
    let OnboardLocation {
        country,
        state,
        district,
        shop_locality,
        nearby_town,
        pin_code,
        key_person_name,
        key_person_contact_number,
        land_phone,
    } = args.location;
    wizard.location.country = country;
    wizard.location.state = state;
    wizard.location.district = district;
    wizard.location.shop_locality = shop_locality;
    wizard.location.nearby_town = nearby_town;
    wizard.location.pin_code = pin_code;
    wizard.location.key_person_name = key_person_name;
    wizard.location.key_person_contact_number = key_person_contact_number;
    wizard.location.land_phone = land_phone;

    wizard.contact.registered_address = args.registered_address;
    wizard.contact.website = args.website;
    wizard.contact.facebook_link = args.facebook_link;
    wizard.contact.instagram_link = args.instagram_link;
    wizard.contact.google_map_link = args.google_map_link;
    wizard.contact.youtube_link = args.youtube_link;

    wizard.store.working_hours_from = args.working_hours_from;
    wizard.store.working_hours_to = args.working_hours_to;
    wizard.store.home_delivery = args.home_delivery;
    wizard.store.logo = read_upload(args.logo.as_deref()).await?;
    wizard.store.store_photo = read_upload(args.store_photo.as_deref()).await?;

    loop {
        let current = wizard.step();
        match wizard.next().await? {
            WizardProgress::Advanced(_) => println!("{current} saved"),
            WizardProgress::Completed(route) => {
                println!("onboarding complete; continue at {route}");
                return Ok(());
            }
        }
    }
}

async fn run_lookup(ctx: &AppContext, lookup: LookupCommand) -> Result<(), CliError> {
    let lookups = ctx.api.lookups();
    match lookup.command {
        LookupSubcommand::ShopTypes => print_json(&lookups.shop_types().await?),
        LookupSubcommand::Countries => print_json(&lookups.countries().await?),
        LookupSubcommand::States { country_id } => print_json(&lookups.states(&country_id).await?),
        LookupSubcommand::Districts { state_id } => print_json(&lookups.districts(&state_id).await?),
    }
}

async fn read_upload(path: Option<&Path>) -> Result<Option<Upload>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadFile { path: path.to_path_buf(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
    Ok(Some(Upload { file_name, bytes }))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
