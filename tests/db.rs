use diesel::prelude::*;
use pushkind_storefront::schema::product_types;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn migrations_seed_product_types() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("should acquire DB connection");

    let slugs: Vec<String> = product_types::table
        .order(product_types::id.asc())
        .select(product_types::slug)
        .load(&mut conn)
        .expect("should load product types");

    assert_eq!(slugs, vec!["jewelry", "watch", "diamond"]);
}
