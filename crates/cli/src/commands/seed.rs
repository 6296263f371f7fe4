//! Seed the database with demo CRM data.
//!
//! Reads customers, products and orders from a YAML fixture (the built-in
//! one by default) and inserts them through the api crate's repositories,
//! so seeded rows pass the same validation and total computation as API
//! writes. Customers whose email already exists are skipped with a warning,
//! so re-running against a seeded database is harmless.

use std::path::Path;

use secrecy::SecretString;
use sqlx::PgPool;
use tracing::{info, warn};

use copperline_api::db::{
    self, CustomerRepository, NewCustomer, OrderCreateOutcome, OrderRepository, ProductRepository,
    RepositoryError,
};
use copperline_core::api::{CustomerInput, ProductInput};
use copperline_core::types::{CustomerId, Email, Phone, ProductId};

const DEFAULT_FIXTURE: &str = include_str!("../../fixtures/seed.yaml");

/// The YAML fixture shape.
#[derive(Debug, serde::Deserialize)]
struct SeedFile {
    #[serde(default)]
    customers: Vec<CustomerInput>,
    #[serde(default)]
    products: Vec<ProductInput>,
    #[serde(default)]
    orders: Vec<SeedOrder>,
}

/// One fixture order, referencing customers and products by list position.
#[derive(Debug, serde::Deserialize)]
struct SeedOrder {
    customer: usize,
    products: Vec<usize>,
}

/// Seed the database from a fixture.
///
/// # Arguments
///
/// * `file` - Path to a YAML fixture, or `None` for the built-in one
///
/// # Errors
///
/// Returns an error if the database URL is missing, the fixture cannot be
/// read or parsed, a fixture row is invalid, or an insert fails for any
/// reason other than a duplicate email.
pub async fn run(file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = std::env::var("CRM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "CRM_DATABASE_URL not set")?;

    let content = match file {
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            info!(path = %path.display(), "Loading seed fixture");
            tokio::fs::read_to_string(path).await?
        }
        None => {
            info!("Using built-in seed fixture");
            DEFAULT_FIXTURE.to_string()
        }
    };

    let seed: SeedFile = serde_yaml::from_str(&content)?;
    info!(
        customers = seed.customers.len(),
        products = seed.products.len(),
        orders = seed.orders.len(),
        "Parsed fixture"
    );

    // Connect to database
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let (customer_ids, customers_created, customers_skipped) =
        seed_customers(&pool, &seed.customers).await?;
    let product_ids = seed_products(&pool, &seed.products).await?;
    let orders_created = seed_orders(&pool, &seed.orders, &customer_ids, &product_ids).await?;

    // Print summary
    info!("Seeding complete!");
    info!("  Customers created: {customers_created} ({customers_skipped} skipped)");
    info!("  Products created: {}", product_ids.len());
    info!("  Orders created: {orders_created}");

    Ok(())
}

/// Insert fixture customers, returning each row's ID in fixture order.
///
/// A duplicate email keeps its slot as `None` so order references to the
/// skipped row fail loudly instead of attaching to the wrong customer.
async fn seed_customers(
    pool: &PgPool,
    inputs: &[CustomerInput],
) -> Result<(Vec<Option<CustomerId>>, u32, u32), Box<dyn std::error::Error>> {
    let repository = CustomerRepository::new(pool);
    let mut ids = Vec::with_capacity(inputs.len());
    let mut created = 0u32;
    let mut skipped = 0u32;

    for input in inputs {
        let email = Email::parse(&input.email)
            .map_err(|e| format!("Fixture customer {}: {e}", input.email))?;
        let phone = input
            .phone
            .as_deref()
            .filter(|phone| !phone.is_empty())
            .map(Phone::parse)
            .transpose()
            .map_err(|e| format!("Fixture customer {}: {e}", input.email))?;
        let new = NewCustomer {
            name: input.name.clone(),
            email,
            phone,
        };

        match repository.create(&new).await {
            Ok(customer) => {
                ids.push(Some(customer.id));
                created += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                warn!(email = %input.email, "Customer already exists, skipping");
                ids.push(None);
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok((ids, created, skipped))
}

/// Insert fixture products, returning each row's ID in fixture order.
async fn seed_products(
    pool: &PgPool,
    inputs: &[ProductInput],
) -> Result<Vec<ProductId>, Box<dyn std::error::Error>> {
    let repository = ProductRepository::new(pool);
    let mut ids = Vec::with_capacity(inputs.len());

    for input in inputs {
        let product = repository
            .create(&input.name, input.price, input.stock.unwrap_or(0))
            .await?;
        ids.push(product.id);
    }

    Ok(ids)
}

/// Insert fixture orders, resolving fixture positions to database IDs.
async fn seed_orders(
    pool: &PgPool,
    orders: &[SeedOrder],
    customer_ids: &[Option<CustomerId>],
    product_ids: &[ProductId],
) -> Result<u32, Box<dyn std::error::Error>> {
    let repository = OrderRepository::new(pool);
    let mut created = 0u32;

    for (position, order) in orders.iter().enumerate() {
        let Some(Some(customer_id)) = customer_ids.get(order.customer).copied() else {
            warn!(
                order = position,
                customer = order.customer,
                "Order references a skipped or unknown customer, skipping"
            );
            continue;
        };
        let Some(selection) = order
            .products
            .iter()
            .map(|index| product_ids.get(*index).copied())
            .collect::<Option<Vec<ProductId>>>()
        else {
            warn!(
                order = position,
                "Order references an unknown product, skipping"
            );
            continue;
        };

        match repository.create(customer_id, &selection, None).await? {
            OrderCreateOutcome::Created(_) => created += 1,
            outcome => warn!(order = position, ?outcome, "Order was not created"),
        }
    }

    Ok(created)
}
