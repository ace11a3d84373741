//! Database seeder for Fiado development and testing.
//!
//! Seeds a handful of customers with open sales, one registered payment,
//! and one batch payment that leaves a remainder, all through the
//! repositories so every business rule applies.
//!
//! Usage: cargo run --bin seeder

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fiado_core::customer::CustomerInput;
use fiado_core::payment::PaymentMethod;
use fiado_core::sale::LineItemInput;
use fiado_db::repositories::customer::CustomerRepository;
use fiado_db::repositories::payment::{
    BatchPaymentInput, PaymentRepository, RegisterPaymentInput,
};
use fiado_db::repositories::sale::{CreateSaleInput, SaleRepository};
use fiado_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fiado=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_config = AppConfig::load()?;
    let config = app_config.credit;

    let db = fiado_db::connect(&app_config.database.url).await?;
    info!("Connected to database");

    let customers = CustomerRepository::new(db.clone());
    let sales = SaleRepository::new(db.clone());
    let payments = PaymentRepository::new(db);

    let maria = customers
        .create(
            customer(
                "Maria Silva",
                Some("529.982.247-25"),
                "(11) 98765-4321",
                Some(dec!(800.00)),
            ),
            &config,
        )
        .await?;
    info!(name = %maria.name, "Created customer");

    let joao = customers
        .create(
            customer("João Pereira", None, "(11) 91234-5678", None),
            &config,
        )
        .await?;
    info!(name = %joao.name, "Created customer");

    let ana = customers
        .create(
            customer("Ana Costa", None, "(21) 99876-1122", None),
            &config,
        )
        .await?;
    info!(name = %ana.name, "Created customer");

    let today = Utc::now().date_naive();

    // Maria: one sale, partially paid.
    let groceries = sales
        .create_sale(
            CreateSaleInput {
                customer_id: maria.id.into_inner(),
                sale_date: today - Days::new(10),
                due_date: None,
                items: vec![
                    item("Arroz 5kg", dec!(2), dec!(25.90)),
                    item("Feijão 1kg", dec!(3), dec!(8.50)),
                    item("Óleo de soja", dec!(1), dec!(7.80)),
                ],
                notes: Some("Compra do mês".to_string()),
            },
            &config,
        )
        .await?;
    info!(total = %groceries.sale.total, "Sale for Maria");

    payments
        .register_payment(RegisterPaymentInput {
            sale_id: groceries.sale.id.into_inner(),
            value: dec!(30.00),
            method: PaymentMethod::Pix,
            tendered: None,
            payment_date: today - Days::new(3),
            notes: None,
        })
        .await?;
    info!("Partial payment for Maria: R$ 30.00");

    // João: three open sales hit by a batch payment that leaves a remainder.
    let mut joao_sales = Vec::new();
    for (days_ago, description, quantity, unit_price) in [
        (45_u64, "Carne bovina 2kg", dec!(2), dec!(32.00)),
        (30, "Compras da semana", dec!(1), dec!(48.70)),
        (15, "Gás de cozinha", dec!(1), dec!(110.00)),
    ] {
        let sale = sales
            .create_sale(
                CreateSaleInput {
                    customer_id: joao.id.into_inner(),
                    sale_date: today - Days::new(days_ago),
                    due_date: None,
                    items: vec![item(description, quantity, unit_price)],
                    notes: None,
                },
                &config,
            )
            .await?;
        joao_sales.push(sale.sale.id.into_inner());
    }

    let batch = payments
        .register_batch_payment(
            BatchPaymentInput {
                customer_id: joao.id.into_inner(),
                sale_ids: joao_sales,
                amount: dec!(150.00),
                method: PaymentMethod::Cash,
                tendered: Some(dec!(150.00)),
                payment_date: today,
                notes: None,
            },
            &config,
        )
        .await?;
    info!(
        amount = %batch.batch.amount_paid,
        sales = batch.outcome.allocations.len(),
        remainder = %batch.batch.remainder,
        "Batch payment for João"
    );

    // Ana: one overdue sale, untouched.
    let overdue_date = today - Days::new(90);
    sales
        .create_sale(
            CreateSaleInput {
                customer_id: ana.id.into_inner(),
                sale_date: overdue_date,
                due_date: Some(overdue_date + Days::new(30)),
                items: vec![item("Material escolar", dec!(1), dec!(64.30))],
                notes: None,
            },
            &config,
        )
        .await?;
    info!("Overdue sale for Ana: R$ 64.30");

    info!("Seeding complete");
    Ok(())
}

fn customer(
    name: &str,
    cpf: Option<&str>,
    phone: &str,
    credit_limit: Option<Decimal>,
) -> CustomerInput {
    CustomerInput {
        name: name.to_string(),
        cpf: cpf.map(ToString::to_string),
        phone: Some(phone.to_string()),
        address: None,
        credit_limit,
        notes: None,
    }
}

fn item(description: &str, quantity: Decimal, unit_price: Decimal) -> LineItemInput {
    LineItemInput {
        description: description.to_string(),
        quantity,
        unit_price,
        expected_subtotal: None,
    }
}
