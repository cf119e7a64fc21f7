//! Binary entry point: open the store and print the customer directory
//! followed by the busiest customers.
use lunchly::{fetch_customers, fetch_top_customers, open_database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lunchly=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let conn = open_database()?;

    let customers = fetch_customers(&conn)?;
    println!("Customers ({}):", customers.len());
    for customer in &customers {
        let reservations = customer.reservations(&conn)?;
        println!(
            "  #{:<4} {:<30} {:<14} {} reservation(s)",
            customer.id(),
            customer.full_name(),
            customer.phone(),
            reservations.len()
        );
        if let Some(latest) = reservations.iter().max_by_key(|r| r.start_at()) {
            println!("         latest: {} for {}", latest.formatted_start_at(), latest.num_guests());
        }
    }

    let top = fetch_top_customers(&conn)?;
    if !top.is_empty() {
        println!();
        println!("Top customers:");
        for (rank, customer) in top.iter().enumerate() {
            println!("  {}. {}", rank + 1, customer);
        }
    }

    Ok(())
}
