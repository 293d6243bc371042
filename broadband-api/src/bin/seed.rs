//! # Demo data seeder
//!
//! Wipes the portal tables and loads one demo customer with four months of
//! bills, one demo engineer and two installation tasks.
//!
//! ```bash
//! cargo run -p broadband-api --bin seed
//! ```
//!
//! Logins after seeding:
//!
//! | Role | Mobile | Password |
//! |---|---|---|
//! | customer | 9876543210 | password |
//! | engineer | 8888888888 | engineer |

use broadband_shared::{
    auth::gate::{AuthGate, UserRegistration},
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    models::{
        bill::BillStatus,
        task::{CreateTask, TaskStatus},
        user::UserRole,
    },
    services::bills::{BillManager, NewBill},
    store::{postgres::PgStore, TaskStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_PLAN: &str = "300 Mbps Fiber Blast";
const MONTHLY_AMOUNT: f64 = 1179.00;

/// `(month, due_date, status)` for the demo customer, newest first
const DEMO_BILLS: [(&str, &str, BillStatus); 4] = [
    ("November 2024", "2024-12-05", BillStatus::Overdue),
    ("October 2024", "2024-11-05", BillStatus::Paid),
    ("September 2024", "2024-10-05", BillStatus::Paid),
    ("August 2024", "2024-09-05", BillStatus::Paid),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,broadband_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let pool = create_pool(DatabaseConfig {
        url: database_url,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    tracing::info!("Clearing existing portal data");
    sqlx::query("TRUNCATE bills, tasks, users")
        .execute(&pool)
        .await?;

    let store = Arc::new(PgStore::new(pool.clone()));
    // Never used to sign anything the server accepts; the gate needs a key
    let gate = AuthGate::new(
        store.clone(),
        "seed-only-signing-key-not-for-tokens",
        chrono::Duration::minutes(1),
    );
    let bills = BillManager::new(store.clone());

    let customer = gate
        .register(UserRegistration {
            mobile: "9876543210".to_string(),
            name: "Rahul Sharma".to_string(),
            password: "password".to_string(),
            role: UserRole::Customer,
            address: Some("Flat 402, Krishna Residency, Indiranagar, Bengaluru".to_string()),
            plan: Some(DEMO_PLAN.to_string()),
        })
        .await?;
    tracing::info!(mobile = %customer.mobile, "Seeded customer");

    let engineer = gate
        .register(UserRegistration {
            mobile: "8888888888".to_string(),
            name: "Tech Engineer".to_string(),
            password: "engineer".to_string(),
            role: UserRole::Engineer,
            address: None,
            plan: None,
        })
        .await?;
    tracing::info!(mobile = %engineer.mobile, "Seeded engineer");

    for (month, due_date, status) in DEMO_BILLS {
        bills
            .create_bill(NewBill {
                user_id: customer.id,
                month: month.to_string(),
                amount: MONTHLY_AMOUNT,
                due_date: due_date.to_string(),
                status,
            })
            .await?;
    }
    tracing::info!(count = DEMO_BILLS.len(), "Seeded bills");

    let demo_tasks = [
        (
            "Priya Menon",
            "9900112233",
            "E-301, Prestige Towers, Whitefield, Bengaluru",
            "1 Gbps Premium",
            TaskStatus::PendingInstallation,
        ),
        (
            "Vikram Singh",
            "9988776655",
            "House 12, Sector 7, HSR Layout, Bengaluru",
            DEMO_PLAN,
            TaskStatus::InstallationScheduled,
        ),
    ];

    // Prospects only; their accounts are provisioned when an engineer files the task
    for (name, mobile, address, plan, status) in demo_tasks {
        store
            .insert_task(CreateTask {
                name: name.to_string(),
                mobile: mobile.to_string(),
                address: address.to_string(),
                plan: plan.to_string(),
                status,
                photo_path: None,
                document_path: None,
            })
            .await?;
    }
    tracing::info!(count = demo_tasks.len(), "Seeded installation tasks");

    close_pool(pool).await;
    tracing::info!("Seeding complete");

    Ok(())
}
