use boutique_admin_api::{
    config::AppConfig,
    db::{DbPool, create_pool, orm_from_pool, run_migrations},
    models::Role,
    services::user_service::hash_password,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(&pool)).await?;

    let admin_id = ensure_user(&pool, "Admin", "admin@example.com", "admin123", Role::Admin).await?;
    let manager_id =
        ensure_user(&pool, "Gestion", "manager@example.com", "manager123", Role::Manager).await?;
    let client_id = ensure_user(&pool, "Client", "client@example.com", "client123", Role::Client).await?;
    seed_products(&pool).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Manager ID: {manager_id}, Client ID: {client_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<i32> {
    let password_hash = hash_password(password)?;

    let (user_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO utilisateurs (nom, email, mot_de_passe_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<()> {
    let products = [
        ("Sweat Ferris", "Sweat chaud pour Rustaceans", Decimal::new(5500, 2), 50, "Vêtements"),
        ("Mug Ferris", "Le café est meilleur avec Ferris", Decimal::new(1200, 2), 100, "Maison"),
        ("Lot d'autocollants", "Pour décorer votre portable", Decimal::new(500, 2), 200, "Accessoires"),
        ("Livre: Async Rust", "Les patrons async en Rust", Decimal::new(2500, 2), 3, "Livres"),
    ];

    for (name, description, price, stock, category) in products {
        sqlx::query(
            r#"
            INSERT INTO produits (nom, description, prix, quantite_stock, categorie)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (nom) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
