//! Write operation resolvers.
//!
//! Every outcome is a `data` payload. Domain rejections carry their message
//! in a `rejected` (or failure) variant, and infrastructure failures are
//! folded into the same shape after logging, so callers branch on the
//! payload rather than on the envelope's error channel.

use rust_decimal::Decimal;

use copperline_core::api::{
    ApiResponse, BulkCreateCustomersResult, BulkCustomerInput, CreateCustomerResult,
    CreateOrderResult, CreateProductResult, CustomerInput, LowStockProduct, LowStockUpdateResult,
    OrderInput, ProductInput,
};
use copperline_core::{Email, Phone, PhoneError};

use crate::db::products::{LOW_STOCK_THRESHOLD, RESTOCK_INCREMENT};
use crate::db::{
    BulkRowOutcome, CustomerRepository, NewCustomer, OrderCreateOutcome, OrderRepository,
    ProductRepository, RepositoryError,
};
use crate::state::AppState;

/// Resolve `create_customer`.
///
/// Format problems and duplicate emails reject the input with a message;
/// only a store failure produces the `Error creating customer` form.
pub async fn create_customer(
    state: &AppState,
    input: CustomerInput,
) -> ApiResponse<CreateCustomerResult> {
    let Ok(email) = Email::parse(&input.email) else {
        return rejected_customer("Invalid email format.");
    };
    let Ok(phone) = parse_optional_phone(input.phone.as_deref()) else {
        return rejected_customer("Invalid phone format.");
    };

    let new = NewCustomer {
        name: input.name,
        email,
        phone,
    };
    let result = match CustomerRepository::new(state.pool()).create(&new).await {
        Ok(customer) => CreateCustomerResult::Created {
            customer,
            message: "Customer created successfully.".to_owned(),
        },
        Err(RepositoryError::Conflict(_)) => CreateCustomerResult::Rejected {
            message: "Email already exists.".to_owned(),
        },
        Err(error) => {
            report_failure("create_customer", &error);
            CreateCustomerResult::Rejected {
                message: format!("Error creating customer: {error}"),
            }
        }
    };
    ApiResponse::data(result)
}

/// Resolve `bulk_create_customers`.
///
/// Rows are validated independently; failing rows become `Row N: ...`
/// messages in input order while the rest are inserted in one transaction.
/// A store failure drops the whole batch and reports a single error.
pub async fn bulk_create_customers(
    state: &AppState,
    input: BulkCustomerInput,
) -> ApiResponse<BulkCreateCustomersResult> {
    let mut row_errors: Vec<(usize, String)> = Vec::new();
    let mut row_numbers: Vec<usize> = Vec::new();
    let mut rows: Vec<NewCustomer> = Vec::new();

    for (index, row) in input.customers.into_iter().enumerate() {
        let row_number = index + 1;
        let Ok(email) = Email::parse(&row.email) else {
            row_errors.push((row_number, format!("Row {row_number}: Invalid email format.")));
            continue;
        };
        let Ok(phone) = parse_optional_phone(row.phone.as_deref()) else {
            row_errors.push((row_number, format!("Row {row_number}: Invalid phone format.")));
            continue;
        };
        row_numbers.push(row_number);
        rows.push(NewCustomer {
            name: row.name,
            email,
            phone,
        });
    }

    if rows.is_empty() {
        return ApiResponse::data(BulkCreateCustomersResult {
            customers: Vec::new(),
            errors: collect_messages(row_errors),
        });
    }

    match CustomerRepository::new(state.pool()).create_many(&rows).await {
        Ok(outcomes) => {
            let mut customers = Vec::new();
            for (row_number, outcome) in row_numbers.into_iter().zip(outcomes) {
                match outcome {
                    BulkRowOutcome::Created(customer) => customers.push(customer),
                    BulkRowOutcome::DuplicateEmail => row_errors
                        .push((row_number, format!("Row {row_number}: Email already exists."))),
                }
            }
            ApiResponse::data(BulkCreateCustomersResult {
                customers,
                errors: collect_messages(row_errors),
            })
        }
        Err(error) => {
            report_failure("bulk_create_customers", &error);
            ApiResponse::data(BulkCreateCustomersResult {
                customers: Vec::new(),
                errors: vec![format!("Error creating customers: {error}")],
            })
        }
    }
}

/// Resolve `create_product`.
pub async fn create_product(
    state: &AppState,
    input: ProductInput,
) -> ApiResponse<CreateProductResult> {
    if input.price <= Decimal::ZERO {
        return rejected_product("Price must be positive.");
    }
    let stock = input.stock.unwrap_or(0);
    if stock < 0 {
        return rejected_product("Stock cannot be negative.");
    }

    let result = match ProductRepository::new(state.pool())
        .create(&input.name, input.price, stock)
        .await
    {
        Ok(product) => CreateProductResult::Created {
            product,
            message: "Product created successfully.".to_owned(),
        },
        Err(error) => {
            report_failure("create_product", &error);
            CreateProductResult::Rejected {
                message: format!("Error creating product: {error}"),
            }
        }
    };
    ApiResponse::data(result)
}

/// Resolve `create_order`.
pub async fn create_order(state: &AppState, input: OrderInput) -> ApiResponse<CreateOrderResult> {
    let outcome = OrderRepository::new(state.pool())
        .create(input.customer_id, &input.product_ids, input.order_date)
        .await;
    let result = match outcome {
        Ok(OrderCreateOutcome::Created(order)) => CreateOrderResult::Created {
            order,
            message: "Order created successfully.".to_owned(),
        },
        Ok(OrderCreateOutcome::UnknownCustomer) => CreateOrderResult::Rejected {
            message: "Invalid customer ID.".to_owned(),
        },
        Ok(OrderCreateOutcome::NoProducts) => CreateOrderResult::Rejected {
            message: "At least one product must be selected.".to_owned(),
        },
        Ok(OrderCreateOutcome::UnknownProduct(id)) => CreateOrderResult::Rejected {
            message: format!("Invalid product ID: {id}"),
        },
        Err(error) => {
            report_failure("create_order", &error);
            CreateOrderResult::Rejected {
                message: format!("Error creating order: {error}"),
            }
        }
    };
    ApiResponse::data(result)
}

/// Resolve `update_low_stock_products`.
///
/// An empty qualifying set is a success with its own message; callers
/// branch on the `success` flag for real failures.
pub async fn update_low_stock_products(state: &AppState) -> ApiResponse<LowStockUpdateResult> {
    let outcome = ProductRepository::new(state.pool())
        .restock_low_stock(LOW_STOCK_THRESHOLD, RESTOCK_INCREMENT)
        .await;
    let result = match outcome {
        Ok(products) if products.is_empty() => LowStockUpdateResult {
            success: true,
            message: "No low-stock products found".to_owned(),
            updated_count: 0,
            updated_products: Vec::new(),
        },
        Ok(products) => {
            let updated_products: Vec<LowStockProduct> = products
                .into_iter()
                .map(|product| LowStockProduct {
                    id: product.id,
                    name: product.name,
                    stock: product.stock,
                })
                .collect();
            LowStockUpdateResult {
                success: true,
                message: format!(
                    "Successfully updated {} low-stock products",
                    updated_products.len()
                ),
                updated_count: updated_products.len() as u64,
                updated_products,
            }
        }
        Err(error) => {
            report_failure("update_low_stock_products", &error);
            LowStockUpdateResult {
                success: false,
                message: format!("Error updating products: {error}"),
                updated_count: 0,
                updated_products: Vec::new(),
            }
        }
    };
    ApiResponse::data(result)
}

/// Parse an optional phone, treating an empty string as absent.
fn parse_optional_phone(raw: Option<&str>) -> Result<Option<Phone>, PhoneError> {
    raw.filter(|phone| !phone.is_empty())
        .map(Phone::parse)
        .transpose()
}

fn rejected_customer(message: &str) -> ApiResponse<CreateCustomerResult> {
    ApiResponse::data(CreateCustomerResult::Rejected {
        message: message.to_owned(),
    })
}

fn rejected_product(message: &str) -> ApiResponse<CreateProductResult> {
    ApiResponse::data(CreateProductResult::Rejected {
        message: message.to_owned(),
    })
}

/// Order collected row errors by row number and drop the indices.
fn collect_messages(mut row_errors: Vec<(usize, String)>) -> Vec<String> {
    row_errors.sort_by_key(|(row_number, _)| *row_number);
    row_errors
        .into_iter()
        .map(|(_, message)| message)
        .collect()
}

/// Log and capture a store failure that is surfaced through a mutation
/// payload instead of the envelope's error channel.
fn report_failure(operation: &'static str, error: &RepositoryError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(operation, error = %error, sentry_event_id = %event_id, "mutation failed");
}
