//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    permreg_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("permission"), "missing permission table");
    assert!(info_str.contains("_migration"), "missing _migration table");

    let mut result = db.query("INFO FOR TABLE permission").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info_str = format!("{:?}", info.expect("table info"));
    assert!(info_str.contains("idx_permission_service_action"));
    assert!(info_str.contains("idx_permission_service"));
    assert!(info_str.contains("idx_permission_action"));
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    permreg_db::run_migrations(&db).await.unwrap();
    permreg_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_pairs() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    permreg_db::run_migrations(&db).await.unwrap();

    db.query("CREATE permission SET service = 'auth', action = 'read'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE permission SET service = 'auth', action = 'read'")
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate (service, action) should be rejected");
}

#[tokio::test]
async fn schema_rejects_separator_inside_a_half() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    permreg_db::run_migrations(&db).await.unwrap();

    let result = db
        .query("CREATE permission SET service = 'a:b', action = 'read'")
        .await
        .unwrap()
        .check();
    assert!(result.is_err());

    let result = db
        .query("CREATE permission SET service = 'auth', action = ''")
        .await
        .unwrap()
        .check();
    assert!(result.is_err());
}
