use pushkind_storefront::domain::cart::{Cart, CartOwner};
use pushkind_storefront::domain::category::{Category, NewCategory};
use pushkind_storefront::domain::order::{Address, CheckoutDetails, NewOrder, OrderStatusChange};
use pushkind_storefront::domain::product::{NewProduct, Product};
use pushkind_storefront::domain::spec::JewelrySpecFields;
use pushkind_storefront::domain::types::{
    CategoryName, CategorySlug, CustomerId, Email, ImagePath, Money, OrderNumber, OrderStatus,
    ProductName, ProductSku, ProductSlug, ProductTypeId, SessionToken, StockLevel,
};
use pushkind_storefront::repository::{
    CartReader, CartWriter, CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository,
    OrderListQuery, OrderReader, OrderWriter, ProductListQuery, ProductReader, ProductTypeReader,
    ProductWriter, RepositoryError, SpecReader, SpecWriter, WishlistReader, WishlistWriter,
};
use pushkind_storefront::specs::ValidatedSpec;

mod common;

fn new_category(slug: &str) -> NewCategory {
    NewCategory {
        name: CategoryName::new(slug.to_uppercase()).unwrap(),
        slug: CategorySlug::new(slug).unwrap(),
        description: None,
        is_active: true,
    }
}

fn new_product(category: &Category, slug: &str, type_id: i32, price: f64, stock: i32) -> NewProduct {
    NewProduct {
        category_id: category.id,
        product_type_id: ProductTypeId::new(type_id).unwrap(),
        name: ProductName::new(format!("Product {slug}")).unwrap(),
        slug: ProductSlug::new(slug).unwrap(),
        description: None,
        price: Money::new(price).unwrap(),
        discount_price: None,
        stock: StockLevel::new(stock).unwrap(),
        sku: ProductSku::new(slug.to_uppercase()).unwrap(),
        is_active: true,
        is_featured: false,
    }
}

fn address() -> Address {
    Address {
        full_name: "Jane Doe".into(),
        line1: "1 Main St".into(),
        line2: None,
        city: "Springfield".into(),
        state: "IL".into(),
        postal_code: "62701".into(),
        country: "US".into(),
        phone: None,
    }
}

fn checkout_order(cart: &Cart, products: &[Product], number: &str) -> NewOrder {
    NewOrder::from_cart(
        OrderNumber::new(number).unwrap(),
        cart,
        products,
        CheckoutDetails {
            email: Email::new("jane@example.com").unwrap(),
            shipping_address: address(),
            billing_address: address(),
        },
    )
}

#[test]
fn test_category_repository_crud() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let rings = repo
        .create_category(&new_category("rings"))
        .expect("create category");
    let mut hidden = new_category("watches");
    hidden.is_active = false;
    repo.create_category(&hidden).expect("create category");

    let (total, all) = repo
        .list_categories(CategoryListQuery::default())
        .expect("list categories");
    assert_eq!(total, 2);
    assert_eq!(all.len(), 2);

    let (total, active) = repo
        .list_categories(CategoryListQuery::default().active())
        .expect("list active categories");
    assert_eq!(total, 1);
    assert_eq!(active[0].id, rings.id);

    let found = repo
        .get_category_by_slug(&CategorySlug::new("rings").unwrap())
        .expect("get by slug")
        .expect("category exists");
    assert_eq!(found.id, rings.id);

    let mut renamed = new_category("rings");
    renamed.name = CategoryName::new("Fine rings").unwrap();
    let affected = repo
        .update_category(rings.id, &renamed)
        .expect("update category");
    assert_eq!(affected, 1);
    let updated = repo
        .get_category_by_id(rings.id)
        .expect("get by id")
        .expect("category exists");
    assert_eq!(updated.name.as_str(), "Fine rings");

    assert_eq!(repo.delete_category(rings.id).expect("delete"), 1);
    assert!(repo.get_category_by_id(rings.id).unwrap().is_none());
}

#[test]
fn test_duplicate_category_slug_conflicts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_category(&new_category("rings"))
        .expect("create category");
    let result = repo.create_category(&new_category("rings"));

    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[test]
fn test_category_with_products_cannot_be_deleted() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    repo.create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .expect("create product");

    let result = repo.delete_category(category.id);

    assert!(matches!(result, Err(RepositoryError::ForeignKey(_))));
    assert!(repo.get_category_by_id(category.id).unwrap().is_some());
}

#[test]
fn test_product_types_are_seeded() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let types = repo.list_product_types().expect("list product types");
    let slugs: Vec<&str> = types.iter().map(|t| t.slug.as_str()).collect();

    assert_eq!(slugs, vec!["jewelry", "watch", "diamond"]);
    assert!(
        repo.get_product_type_by_id(ProductTypeId::new(4).unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_product_images_keep_upload_order() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let product = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .expect("create product");
    assert!(product.images.is_empty());

    let first = repo
        .add_product_image(product.id, &ImagePath::new("products/a.jpg").unwrap())
        .expect("add image");
    let second = repo
        .add_product_image(product.id, &ImagePath::new("products/b.jpg").unwrap())
        .expect("add image");
    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);

    let loaded = repo.get_product_by_id(product.id).unwrap().unwrap();
    let paths: Vec<&str> = loaded.images.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["products/a.jpg", "products/b.jpg"]);

    let removed = repo
        .delete_product_image(product.id, first.id)
        .expect("delete image");
    assert_eq!(removed.map(|p| p.as_str().to_string()).as_deref(), Some("products/a.jpg"));
    assert!(
        repo.delete_product_image(product.id, first.id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_product_listing_filters() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let rings = repo.create_category(&new_category("rings")).unwrap();
    let watches = repo.create_category(&new_category("watches")).unwrap();
    repo.create_product(&new_product(&rings, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let mut featured = new_product(&watches, "diver", 2, 900.0, 1);
    featured.is_featured = true;
    repo.create_product(&featured).unwrap();
    let mut inactive = new_product(&rings, "old-ring", 1, 100.0, 1);
    inactive.is_active = false;
    repo.create_product(&inactive).unwrap();

    let (total, _) = repo.list_products(ProductListQuery::default()).unwrap();
    assert_eq!(total, 3);

    let (total, active) = repo
        .list_products(ProductListQuery::default().active())
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(active[0].slug.as_str(), "diver");

    let (total, in_rings) = repo
        .list_products(ProductListQuery::default().active().category(rings.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(in_rings[0].slug.as_str(), "gold-ring");

    let (total, _) = repo
        .list_products(ProductListQuery::default().featured())
        .unwrap();
    assert_eq!(total, 1);

    let (total, found) = repo
        .list_products(ProductListQuery::default().search("GOLD"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].slug.as_str(), "gold-ring");

    let (total, page) = repo
        .list_products(ProductListQuery::default().paginate(2, 2))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
}

#[test]
fn test_jewelry_spec_upsert_keeps_untouched_fields() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let product = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();

    let initial = JewelrySpecFields {
        metal_type: Some(Some("gold".into())),
        purity: Some(Some("22K".into())),
        gross_weight: Some(Some(5.2)),
        ..Default::default()
    };
    repo.create_jewelry_spec(product.id, &initial)
        .expect("create spec");

    let patch = JewelrySpecFields {
        purity: Some(Some("18K".into())),
        gross_weight: Some(None),
        ..Default::default()
    };
    repo.upsert_jewelry_spec(product.id, &patch)
        .expect("upsert spec");

    let spec = repo
        .get_jewelry_spec(product.id)
        .unwrap()
        .expect("spec exists");
    assert_eq!(spec.metal_type.as_deref(), Some("gold"));
    assert_eq!(spec.purity.as_deref(), Some("18K"));
    assert_eq!(spec.gross_weight, None);
    assert!(repo.get_watch_spec(product.id).unwrap().is_none());
}

#[test]
fn test_spec_upsert_inserts_missing_record() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let product = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();

    let patch = JewelrySpecFields {
        size: Some(Some("7".into())),
        ..Default::default()
    };
    repo.upsert_jewelry_spec(product.id, &patch)
        .expect("upsert spec");

    let spec = repo.get_jewelry_spec(product.id).unwrap().unwrap();
    assert_eq!(spec.size.as_deref(), Some("7"));
}

#[test]
fn test_huid_taken_ignores_own_product() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let first = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let second = repo
        .create_product(&new_product(&category, "silver-ring", 1, 200.0, 3))
        .unwrap();

    let fields = JewelrySpecFields {
        huid: Some(Some("AB12CD".into())),
        ..Default::default()
    };
    repo.create_jewelry_spec(first.id, &fields).unwrap();

    assert!(repo.huid_taken("AB12CD", None).unwrap());
    assert!(repo.huid_taken("AB12CD", Some(second.id)).unwrap());
    assert!(!repo.huid_taken("AB12CD", Some(first.id)).unwrap());
    assert!(!repo.huid_taken("ZZ99ZZ", None).unwrap());

    let duplicate = repo.create_jewelry_spec(second.id, &fields);
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
}

#[test]
fn test_huid_upsert_conflicts_with_other_product() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let first = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let second = repo
        .create_product(&new_product(&category, "silver-ring", 1, 200.0, 3))
        .unwrap();

    let fields = JewelrySpecFields {
        huid: Some(Some("AB12CD".into())),
        ..Default::default()
    };
    repo.create_jewelry_spec(first.id, &fields).unwrap();

    let taken = repo.upsert_jewelry_spec(second.id, &fields);
    assert!(matches!(taken, Err(RepositoryError::Conflict(_))));
    assert!(repo.get_jewelry_spec(second.id).unwrap().is_none());

    let own = JewelrySpecFields {
        huid: Some(Some("AB12CD".into())),
        size: Some(Some("7".into())),
        ..Default::default()
    };
    repo.upsert_jewelry_spec(first.id, &own)
        .expect("own huid is accepted");
    let spec = repo.get_jewelry_spec(first.id).unwrap().unwrap();
    assert_eq!(spec.huid.as_deref(), Some("AB12CD"));
    assert_eq!(spec.size.as_deref(), Some("7"));
}

#[test]
fn test_product_update_rolls_back_on_spec_conflict() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let first = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let second = repo
        .create_product(&new_product(&category, "silver-ring", 1, 200.0, 3))
        .unwrap();
    repo.create_jewelry_spec(
        first.id,
        &JewelrySpecFields {
            huid: Some(Some("AB12CD".into())),
            ..Default::default()
        },
    )
    .unwrap();

    let mut changed = new_product(&category, "silver-ring", 2, 999.0, 0);
    changed.name = ProductName::new("Renamed").unwrap();
    let spec = ValidatedSpec::Jewelry(JewelrySpecFields {
        huid: Some(Some("AB12CD".into())),
        ..Default::default()
    });

    let result = repo.update_product_with_spec(second.id, &changed, &spec);

    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    let unchanged = repo.get_product_by_id(second.id).unwrap().unwrap();
    assert_eq!(unchanged.name.as_str(), "Product silver-ring");
    assert_eq!(unchanged.price.get(), 200.0);
    assert_eq!(unchanged.product_type_id.get(), 1);
    assert!(repo.get_jewelry_spec(second.id).unwrap().is_none());
}

#[test]
fn test_product_update_writes_product_and_spec() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let ring = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();

    let changed = new_product(&category, "gold-ring", 1, 450.0, 3);
    let spec = ValidatedSpec::Jewelry(JewelrySpecFields {
        metal_type: Some(Some("gold".into())),
        ..Default::default()
    });
    let affected = repo
        .update_product_with_spec(ring.id, &changed, &spec)
        .expect("update product");

    assert_eq!(affected, 1);
    let stored_product = repo.get_product_by_id(ring.id).unwrap().unwrap();
    assert_eq!(stored_product.price.get(), 450.0);
    let stored = repo.get_jewelry_spec(ring.id).unwrap().unwrap();
    assert_eq!(stored.metal_type.as_deref(), Some("gold"));
}

#[test]
fn test_cart_save_and_find_round_trip() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let ring = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let owner = CartOwner::Session(SessionToken::new("guest-token").unwrap());

    assert!(repo.find_cart(&owner).unwrap().is_none());

    let mut cart = Cart::new(owner.clone());
    cart.add_item(ring.id, 2, ring.effective_price());
    cart.calculate_totals();
    let saved = repo.save_cart(&cart).expect("save cart");
    assert!(saved.id.is_some());

    let loaded = repo.find_cart(&owner).unwrap().expect("cart exists");
    assert_eq!(loaded.id, saved.id);
    assert_eq!(loaded.line(ring.id).map(|l| l.quantity), Some(2));
    assert_eq!(loaded.totals(), cart.totals());

    let mut emptied = loaded;
    emptied.remove_item(ring.id);
    emptied.calculate_totals();
    repo.save_cart(&emptied).expect("save cart");

    let loaded = repo.find_cart(&owner).unwrap().unwrap();
    assert!(loaded.is_empty());
    assert_eq!(loaded.totals().total, 0.0);
}

#[test]
fn test_place_order_takes_stock_and_empties_cart() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let ring = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let customer = CustomerId::new("customer-1").unwrap();
    let owner = CartOwner::Customer(customer.clone());

    let mut cart = Cart::new(owner.clone());
    cart.add_item(ring.id, 2, ring.effective_price());
    cart.calculate_totals();
    let cart = repo.save_cart(&cart).unwrap();

    let order = repo
        .place_order(&checkout_order(&cart, &[ring.clone()], "ORD-1"), &cart)
        .expect("place order");

    assert_eq!(order.order_number.as_str(), "ORD-1");
    assert_eq!(order.customer_id.as_ref(), Some(&customer));
    assert_eq!(order.order_status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].line_total, 1000.0);

    let ring = repo.get_product_by_id(ring.id).unwrap().unwrap();
    assert_eq!(ring.stock.get(), 1);
    assert!(repo.find_cart(&owner).unwrap().unwrap().is_empty());

    let (total, mine) = repo
        .list_orders(OrderListQuery::default().customer(customer))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(mine[0].id, order.id);
}

#[test]
fn test_place_order_without_stock_writes_nothing() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let ring = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 1))
        .unwrap();
    let owner = CartOwner::Session(SessionToken::new("guest-token").unwrap());

    let mut cart = Cart::new(owner.clone());
    cart.add_item(ring.id, 2, ring.effective_price());
    cart.calculate_totals();
    let cart = repo.save_cart(&cart).unwrap();

    let result = repo.place_order(&checkout_order(&cart, &[ring.clone()], "ORD-1"), &cart);

    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    let (total, _) = repo.list_orders(OrderListQuery::default()).unwrap();
    assert_eq!(total, 0);
    assert_eq!(repo.get_product_by_id(ring.id).unwrap().unwrap().stock.get(), 1);
    assert!(!repo.find_cart(&owner).unwrap().unwrap().is_empty());
}

#[test]
fn test_status_change_stamps_shipped_at() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let ring = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let mut cart = Cart::new(CartOwner::Session(SessionToken::new("t").unwrap()));
    cart.add_item(ring.id, 1, ring.effective_price());
    cart.calculate_totals();
    let cart = repo.save_cart(&cart).unwrap();
    let order = repo
        .place_order(&checkout_order(&cart, &[ring], "ORD-1"), &cart)
        .unwrap();
    assert!(order.shipped_at.is_none());

    let affected = repo
        .apply_status_change(order.id, OrderStatusChange::Fulfilment(OrderStatus::Shipped))
        .expect("change status");
    assert_eq!(affected, 1);

    let shipped = repo.get_order_by_id(order.id).unwrap().unwrap();
    assert_eq!(shipped.order_status, OrderStatus::Shipped);
    assert!(shipped.shipped_at.is_some());

    let (total, _) = repo
        .list_orders(OrderListQuery::default().status(OrderStatus::Pending))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_wishlist_add_is_idempotent() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let category = repo.create_category(&new_category("rings")).unwrap();
    let ring = repo
        .create_product(&new_product(&category, "gold-ring", 1, 500.0, 3))
        .unwrap();
    let customer = CustomerId::new("customer-1").unwrap();

    repo.add_to_wishlist(&customer, ring.id).expect("add");
    repo.add_to_wishlist(&customer, ring.id).expect("add again");

    let items = repo.list_wishlist(&customer).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, ring.id);

    assert_eq!(repo.remove_from_wishlist(&customer, ring.id).unwrap(), 1);
    assert!(repo.list_wishlist(&customer).unwrap().is_empty());
}
