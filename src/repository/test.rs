use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Utc};

use crate::domain::cart::{Cart, CartOwner};
use crate::domain::category::{Category, NewCategory};
use crate::domain::order::{NewOrder, Order, OrderStatusChange};
use crate::domain::product::{NewProduct, Product, ProductImage};
use crate::domain::product_type::ProductType;
use crate::domain::spec::{
    DiamondSpec, DiamondSpecFields, JewelrySpec, JewelrySpecFields, SpecField, ValidatedSpec,
    WatchSpec, WatchSpecFields,
};
use crate::domain::types::{
    CartId, CategoryId, CategorySlug, CustomerId, ImagePath, OrderId, OrderStatus, PaymentStatus,
    ProductId, ProductImageId, ProductSlug, ProductTypeId, ProductTypeName, ProductTypeSlug,
    StockLevel,
};
use crate::domain::wishlist::WishlistItem;
use crate::repository::{
    CartReader, CartWriter, CategoryListQuery, CategoryReader, CategoryWriter, OrderListQuery,
    OrderReader, OrderWriter, ProductListQuery, ProductReader, ProductTypeReader, ProductWriter,
    RepositoryError, RepositoryResult, SpecReader, SpecWriter, WishlistReader, WishlistWriter,
};

#[derive(Default)]
struct State {
    next_id: i32,
    categories: Vec<Category>,
    product_types: Vec<ProductType>,
    products: Vec<Product>,
    jewelry_specs: BTreeMap<ProductId, JewelrySpec>,
    watch_specs: BTreeMap<ProductId, WatchSpec>,
    diamond_specs: BTreeMap<ProductId, DiamondSpec>,
    carts: Vec<Cart>,
    wishlist: Vec<WishlistItem>,
    orders: Vec<Order>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Simple in-memory repository used for unit tests.
///
/// Mirrors the constraints the database enforces: unique slugs, unique HUIDs
/// and one spec record per product.
#[derive(Default)]
pub struct TestRepository {
    state: RefCell<State>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn patch<T: Clone>(target: &mut Option<T>, value: &SpecField<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl TestRepository {
    /// Repository seeded with the three built-in product types: jewelry (1),
    /// watch (2) and diamond (3).
    pub fn new() -> Self {
        let repo = Self::default();
        {
            let mut state = repo.state.borrow_mut();
            for (slug, name) in [("jewelry", "Jewelry"), ("watch", "Watch"), ("diamond", "Diamond")]
            {
                let id = state.next_id();
                state.product_types.push(ProductType {
                    id: ProductTypeId::new(id).unwrap(),
                    slug: ProductTypeSlug::new(slug).unwrap(),
                    name: ProductTypeName::new(name).unwrap(),
                });
            }
        }
        repo
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for category in &categories {
                state.next_id = state.next_id.max(category.id.get());
            }
            state.categories.extend(categories);
        }
        self
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for product in &products {
                state.next_id = state.next_id.max(product.id.get());
            }
            state.products.extend(products);
        }
        self
    }

    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for order in &orders {
                state.next_id = state.next_id.max(order.id.get());
            }
            state.orders.extend(orders);
        }
        self
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.state
            .borrow()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.state.borrow().orders.clone()
    }

    /// Number of spec rows of any kind stored for `product_id`.
    pub fn spec_rows(&self, product_id: ProductId) -> usize {
        let state = self.state.borrow();
        usize::from(state.jewelry_specs.contains_key(&product_id))
            + usize::from(state.watch_specs.contains_key(&product_id))
            + usize::from(state.diamond_specs.contains_key(&product_id))
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        let mut items: Vec<Category> = self.state.borrow().categories.clone();
        if query.active_only {
            items.retain(|c| c.is_active);
        }
        let total = items.len();
        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip(pagination.offset() as usize)
                .take(pagination.limit() as usize)
                .collect();
        }
        Ok((total, items))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self
            .state
            .borrow()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>> {
        Ok(self
            .state
            .borrow()
            .categories
            .iter()
            .find(|c| &c.slug == slug)
            .cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut state = self.state.borrow_mut();
        if state.categories.iter().any(|c| c.slug == category.slug) {
            return Err(RepositoryError::Conflict("categories.slug".into()));
        }
        let created = Category {
            id: CategoryId::new(state.next_id())?,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            is_active: category.is_active,
            created_at: now(),
            updated_at: now(),
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn update_category(&self, id: CategoryId, category: &NewCategory) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        match state.categories.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                existing.name = category.name.clone();
                existing.slug = category.slug.clone();
                existing.description = category.description.clone();
                existing.is_active = category.is_active;
                existing.updated_at = now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        if state.products.iter().any(|p| p.category_id == id) {
            return Err(RepositoryError::ForeignKey("products.category_id".into()));
        }
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        Ok(before - state.categories.len())
    }
}

impl ProductTypeReader for TestRepository {
    fn list_product_types(&self) -> RepositoryResult<Vec<ProductType>> {
        Ok(self.state.borrow().product_types.clone())
    }

    fn get_product_type_by_id(&self, id: ProductTypeId) -> RepositoryResult<Option<ProductType>> {
        Ok(self
            .state
            .borrow()
            .product_types
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut items: Vec<Product> = self.state.borrow().products.clone();
        if let Some(category_id) = query.category_id {
            items.retain(|p| p.category_id == category_id);
        }
        if query.active_only {
            items.retain(|p| p.is_active);
        }
        if query.featured_only {
            items.retain(|p| p.is_featured);
        }
        if let Some(search) = query.search.as_deref().map(str::to_lowercase) {
            items.retain(|p| {
                p.name.to_lowercase().contains(&search) || p.sku.to_lowercase().contains(&search)
            });
        }
        let total = items.len();
        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip(pagination.offset() as usize)
                .take(pagination.limit() as usize)
                .collect();
        }
        Ok((total, items))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.product(id))
    }

    fn get_product_by_slug(&self, slug: &ProductSlug) -> RepositoryResult<Option<Product>> {
        Ok(self
            .state
            .borrow()
            .products
            .iter()
            .find(|p| &p.slug == slug)
            .cloned())
    }

    fn get_products_by_ids(&self, ids: &[ProductId]) -> RepositoryResult<Vec<Product>> {
        Ok(self
            .state
            .borrow()
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut state = self.state.borrow_mut();
        if state
            .products
            .iter()
            .any(|p| p.slug == product.slug || p.sku == product.sku)
        {
            return Err(RepositoryError::Conflict("products.slug".into()));
        }
        let created = Product {
            id: ProductId::new(state.next_id())?,
            category_id: product.category_id,
            product_type_id: product.product_type_id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price,
            discount_price: product.discount_price,
            stock: product.stock,
            sku: product.sku.clone(),
            is_active: product.is_active,
            is_featured: product.is_featured,
            created_at: now(),
            updated_at: now(),
            images: vec![],
        };
        state.products.push(created.clone());
        Ok(created)
    }

    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        match state.products.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                existing.category_id = product.category_id;
                existing.product_type_id = product.product_type_id;
                existing.name = product.name.clone();
                existing.slug = product.slug.clone();
                existing.description = product.description.clone();
                existing.price = product.price;
                existing.discount_price = product.discount_price;
                existing.stock = product.stock;
                existing.sku = product.sku.clone();
                existing.is_active = product.is_active;
                existing.is_featured = product.is_featured;
                existing.updated_at = now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn update_product_with_spec(
        &self,
        id: ProductId,
        product: &NewProduct,
        spec: &ValidatedSpec,
    ) -> RepositoryResult<usize> {
        let before = self.product(id);
        let affected = self.update_product(id, product)?;
        if affected == 0 || spec.is_empty() {
            return Ok(affected);
        }

        let written = match spec {
            ValidatedSpec::Jewelry(fields) => self.upsert_jewelry_spec(id, fields),
            ValidatedSpec::Watch(fields) => self.upsert_watch_spec(id, fields),
            ValidatedSpec::Diamond(fields) => self.upsert_diamond_spec(id, fields),
        };
        if let Err(e) = written {
            // Roll the product row back like the database transaction does.
            let mut state = self.state.borrow_mut();
            if let (Some(before), Some(row)) =
                (before, state.products.iter_mut().find(|p| p.id == id))
            {
                *row = before;
            }
            return Err(e);
        }
        Ok(affected)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        state.jewelry_specs.remove(&id);
        state.watch_specs.remove(&id);
        state.diamond_specs.remove(&id);
        state.wishlist.retain(|w| w.product_id != id);
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        Ok(before - state.products.len())
    }

    fn add_product_image(
        &self,
        product_id: ProductId,
        path: &ImagePath,
    ) -> RepositoryResult<ProductImage> {
        let mut state = self.state.borrow_mut();
        let id = ProductImageId::new(state.next_id())?;
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| RepositoryError::ForeignKey("product_images.product_id".into()))?;
        let image = ProductImage {
            id,
            path: path.clone(),
            position: product.images.iter().map(|i| i.position + 1).max().unwrap_or(0),
        };
        product.images.push(image.clone());
        Ok(image)
    }

    fn delete_product_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> RepositoryResult<Option<ImagePath>> {
        let mut state = self.state.borrow_mut();
        let Some(product) = state.products.iter_mut().find(|p| p.id == product_id) else {
            return Ok(None);
        };
        let position = product.images.iter().position(|i| i.id == image_id);
        Ok(position.map(|index| product.images.remove(index).path))
    }
}

impl SpecReader for TestRepository {
    fn get_jewelry_spec(&self, product_id: ProductId) -> RepositoryResult<Option<JewelrySpec>> {
        Ok(self.state.borrow().jewelry_specs.get(&product_id).cloned())
    }

    fn get_watch_spec(&self, product_id: ProductId) -> RepositoryResult<Option<WatchSpec>> {
        Ok(self.state.borrow().watch_specs.get(&product_id).cloned())
    }

    fn get_diamond_spec(&self, product_id: ProductId) -> RepositoryResult<Option<DiamondSpec>> {
        Ok(self.state.borrow().diamond_specs.get(&product_id).cloned())
    }

    fn huid_taken(&self, huid: &str, except: Option<ProductId>) -> RepositoryResult<bool> {
        Ok(self
            .state
            .borrow()
            .jewelry_specs
            .values()
            .any(|s| s.huid.as_deref() == Some(huid) && Some(s.product_id) != except))
    }
}

impl TestRepository {
    fn write_jewelry_spec(
        &self,
        product_id: ProductId,
        fields: &JewelrySpecFields,
        allow_existing: bool,
    ) -> RepositoryResult<usize> {
        if let Some(Some(huid)) = &fields.huid
            && self.huid_taken(huid, Some(product_id))?
        {
            return Err(RepositoryError::Conflict("jewelry_specs.huid".into()));
        }
        let mut state = self.state.borrow_mut();
        if !allow_existing && state.jewelry_specs.contains_key(&product_id) {
            return Err(RepositoryError::Conflict("jewelry_specs.product_id".into()));
        }
        let spec = state
            .jewelry_specs
            .entry(product_id)
            .or_insert_with(|| JewelrySpec {
                product_id,
                metal_type: None,
                purity: None,
                gross_weight: None,
                net_weight: None,
                stone_weight: None,
                making_charge: None,
                making_charge_type: None,
                huid: None,
                size: None,
                created_at: now(),
                updated_at: now(),
            });
        patch(&mut spec.metal_type, &fields.metal_type);
        patch(&mut spec.purity, &fields.purity);
        patch(&mut spec.gross_weight, &fields.gross_weight);
        patch(&mut spec.net_weight, &fields.net_weight);
        patch(&mut spec.stone_weight, &fields.stone_weight);
        patch(&mut spec.making_charge, &fields.making_charge);
        patch(&mut spec.making_charge_type, &fields.making_charge_type);
        patch(&mut spec.huid, &fields.huid);
        patch(&mut spec.size, &fields.size);
        spec.updated_at = now();
        Ok(1)
    }

    fn write_watch_spec(
        &self,
        product_id: ProductId,
        fields: &WatchSpecFields,
        allow_existing: bool,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        if !allow_existing && state.watch_specs.contains_key(&product_id) {
            return Err(RepositoryError::Conflict("watch_specs.product_id".into()));
        }
        let spec = state
            .watch_specs
            .entry(product_id)
            .or_insert_with(|| WatchSpec {
                product_id,
                brand: None,
                model_number: None,
                movement_type: None,
                case_material: None,
                case_size_mm: None,
                strap_material: None,
                dial_color: None,
                water_resistance_m: None,
                warranty_months: None,
                created_at: now(),
                updated_at: now(),
            });
        patch(&mut spec.brand, &fields.brand);
        patch(&mut spec.model_number, &fields.model_number);
        patch(&mut spec.movement_type, &fields.movement_type);
        patch(&mut spec.case_material, &fields.case_material);
        patch(&mut spec.case_size_mm, &fields.case_size_mm);
        patch(&mut spec.strap_material, &fields.strap_material);
        patch(&mut spec.dial_color, &fields.dial_color);
        patch(&mut spec.water_resistance_m, &fields.water_resistance_m);
        patch(&mut spec.warranty_months, &fields.warranty_months);
        spec.updated_at = now();
        Ok(1)
    }

    fn write_diamond_spec(
        &self,
        product_id: ProductId,
        fields: &DiamondSpecFields,
        allow_existing: bool,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        if !allow_existing && state.diamond_specs.contains_key(&product_id) {
            return Err(RepositoryError::Conflict("diamond_specs.product_id".into()));
        }
        let spec = state
            .diamond_specs
            .entry(product_id)
            .or_insert_with(|| DiamondSpec {
                product_id,
                shape: None,
                carat: None,
                cut: None,
                color: None,
                clarity: None,
                certification_lab: None,
                certificate_number: None,
                polish: None,
                symmetry: None,
                fluorescence: None,
                created_at: now(),
                updated_at: now(),
            });
        patch(&mut spec.shape, &fields.shape);
        patch(&mut spec.carat, &fields.carat);
        patch(&mut spec.cut, &fields.cut);
        patch(&mut spec.color, &fields.color);
        patch(&mut spec.clarity, &fields.clarity);
        patch(&mut spec.certification_lab, &fields.certification_lab);
        patch(&mut spec.certificate_number, &fields.certificate_number);
        patch(&mut spec.polish, &fields.polish);
        patch(&mut spec.symmetry, &fields.symmetry);
        patch(&mut spec.fluorescence, &fields.fluorescence);
        spec.updated_at = now();
        Ok(1)
    }
}

impl SpecWriter for TestRepository {
    fn create_jewelry_spec(
        &self,
        product_id: ProductId,
        fields: &JewelrySpecFields,
    ) -> RepositoryResult<usize> {
        self.write_jewelry_spec(product_id, fields, false)
    }

    fn upsert_jewelry_spec(
        &self,
        product_id: ProductId,
        fields: &JewelrySpecFields,
    ) -> RepositoryResult<usize> {
        self.write_jewelry_spec(product_id, fields, true)
    }

    fn create_watch_spec(
        &self,
        product_id: ProductId,
        fields: &WatchSpecFields,
    ) -> RepositoryResult<usize> {
        self.write_watch_spec(product_id, fields, false)
    }

    fn upsert_watch_spec(
        &self,
        product_id: ProductId,
        fields: &WatchSpecFields,
    ) -> RepositoryResult<usize> {
        self.write_watch_spec(product_id, fields, true)
    }

    fn create_diamond_spec(
        &self,
        product_id: ProductId,
        fields: &DiamondSpecFields,
    ) -> RepositoryResult<usize> {
        self.write_diamond_spec(product_id, fields, false)
    }

    fn upsert_diamond_spec(
        &self,
        product_id: ProductId,
        fields: &DiamondSpecFields,
    ) -> RepositoryResult<usize> {
        self.write_diamond_spec(product_id, fields, true)
    }
}

impl CartReader for TestRepository {
    fn find_cart(&self, owner: &CartOwner) -> RepositoryResult<Option<Cart>> {
        Ok(self
            .state
            .borrow()
            .carts
            .iter()
            .find(|c| &c.owner == owner)
            .cloned())
    }
}

impl CartWriter for TestRepository {
    fn save_cart(&self, cart: &Cart) -> RepositoryResult<Cart> {
        let mut state = self.state.borrow_mut();
        let mut saved = cart.clone();
        if saved.id.is_none() {
            saved.id = Some(CartId::new(state.next_id())?);
        }
        state.carts.retain(|c| c.id != saved.id);
        state.carts.push(saved.clone());
        Ok(saved)
    }
}

impl WishlistReader for TestRepository {
    fn list_wishlist(&self, customer_id: &CustomerId) -> RepositoryResult<Vec<WishlistItem>> {
        Ok(self
            .state
            .borrow()
            .wishlist
            .iter()
            .filter(|w| &w.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

impl WishlistWriter for TestRepository {
    fn add_to_wishlist(
        &self,
        customer_id: &CustomerId,
        product_id: ProductId,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        if state
            .wishlist
            .iter()
            .any(|w| &w.customer_id == customer_id && w.product_id == product_id)
        {
            return Ok(0);
        }
        state.wishlist.push(WishlistItem {
            customer_id: customer_id.clone(),
            product_id,
            created_at: now(),
        });
        Ok(1)
    }

    fn remove_from_wishlist(
        &self,
        customer_id: &CustomerId,
        product_id: ProductId,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        let before = state.wishlist.len();
        state
            .wishlist
            .retain(|w| !(&w.customer_id == customer_id && w.product_id == product_id));
        Ok(before - state.wishlist.len())
    }
}

impl OrderReader for TestRepository {
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)> {
        let mut items: Vec<Order> = self.state.borrow().orders.clone();
        if let Some(customer_id) = &query.customer_id {
            items.retain(|o| o.customer_id.as_ref() == Some(customer_id));
        }
        if let Some(status) = query.status {
            items.retain(|o| o.order_status == status);
        }
        items.reverse();
        let total = items.len();
        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip(pagination.offset() as usize)
                .take(pagination.limit() as usize)
                .collect();
        }
        Ok((total, items))
    }

    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        Ok(self
            .state
            .borrow()
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }
}

impl OrderWriter for TestRepository {
    fn place_order(&self, order: &NewOrder, cart: &Cart) -> RepositoryResult<Order> {
        let mut state = self.state.borrow_mut();

        for item in &order.items {
            let enough = state
                .products
                .iter()
                .find(|p| p.id == item.product_id)
                .is_some_and(|p| i64::from(p.stock.get()) >= i64::from(item.quantity));
            if !enough {
                return Err(RepositoryError::Conflict(format!(
                    "insufficient stock for {}",
                    item.sku
                )));
            }
        }
        for item in &order.items {
            if let Some(product) = state.products.iter_mut().find(|p| p.id == item.product_id) {
                let remaining = product.stock.get() - item.quantity as i32;
                product.stock = StockLevel::new(remaining)?;
            }
        }

        let placed = Order {
            id: OrderId::new(state.next_id())?,
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            session_token: order.session_token.clone(),
            email: order.email.clone(),
            shipping_address: order.shipping_address.clone(),
            billing_address: order.billing_address.clone(),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping: order.shipping,
            discount: order.discount,
            total: order.total,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            paid_at: None,
            shipped_at: None,
            delivered_at: None,
            created_at: now(),
            updated_at: now(),
            items: order.items.clone(),
        };
        state.orders.push(placed.clone());

        if let Some(stored) = state.carts.iter_mut().find(|c| c.id == cart.id) {
            stored.clear();
        }

        Ok(placed)
    }

    fn apply_status_change(
        &self,
        id: OrderId,
        change: OrderStatusChange,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.borrow_mut();
        let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(0);
        };
        let stamp = now();
        match change {
            OrderStatusChange::Fulfilment(status) => {
                match status {
                    OrderStatus::Shipped => order.shipped_at = Some(stamp),
                    OrderStatus::Delivered => order.delivered_at = Some(stamp),
                    _ => {}
                }
                order.order_status = status;
            }
            OrderStatusChange::Payment(status) => {
                if status == PaymentStatus::Paid {
                    order.paid_at = Some(stamp);
                }
                order.payment_status = status;
            }
        }
        order.updated_at = stamp;
        Ok(1)
    }
}
