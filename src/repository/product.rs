use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{NewProduct, Product, ProductImage};
use crate::domain::spec::ValidatedSpec;
use crate::domain::types::{ImagePath, ProductId, ProductImageId, ProductSlug};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::models::product_image::{NewProductImage, ProductImage as DbProductImage};
use crate::repository::spec::upsert_spec;
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult,
};

/// Attach images to loaded product rows, preserving row order.
fn with_images(
    conn: &mut SqliteConnection,
    rows: Vec<DbProduct>,
) -> RepositoryResult<Vec<Product>> {
    use crate::schema::product_images;

    let images = DbProductImage::belonging_to(&rows)
        .order((product_images::position.asc(), product_images::id.asc()))
        .select(DbProductImage::as_select())
        .load::<DbProductImage>(conn)?
        .grouped_by(&rows);

    let products = rows
        .into_iter()
        .zip(images)
        .map(|(row, images)| {
            let images = images
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<ProductImage>, _>>()?;
            row.into_domain(images)
        })
        .collect::<Result<Vec<Product>, _>>()?;

    Ok(products)
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(category_id) = query.category_id {
                items = items.filter(products::category_id.eq(category_id.get()));
            }
            if query.active_only {
                items = items.filter(products::is_active.eq(true));
            }
            if query.featured_only {
                items = items.filter(products::is_featured.eq(true));
            }
            if let Some(search) = query.search.as_deref().map(str::trim)
                && !search.is_empty()
            {
                let pattern = format!("%{search}%");
                items = items.filter(
                    products::name
                        .like(pattern.clone())
                        .or(products::sku.like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let rows = items
            .order((products::is_featured.desc(), products::name.asc()))
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?;

        Ok((total, with_images(&mut conn, rows)?))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let rows = products::table
            .filter(products::id.eq(id.get()))
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?;

        Ok(with_images(&mut conn, rows)?.pop())
    }

    fn get_product_by_slug(&self, slug: &ProductSlug) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let rows = products::table
            .filter(products::slug.eq(slug.as_str()))
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?;

        Ok(with_images(&mut conn, rows)?.pop())
    }

    fn get_products_by_ids(&self, ids: &[ProductId]) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;

        let rows = products::table
            .filter(products::id.eq_any(ids.iter().map(|id| id.get())))
            .order(products::id.asc())
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?;

        with_images(&mut conn, rows)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.into();

        let created = diesel::insert_into(products::table)
            .values(&db_product)
            .returning(DbProduct::as_returning())
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into_domain(vec![])?)
    }

    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.into();

        let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set(&db_product)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_product_with_spec(
        &self,
        id: ProductId,
        product: &NewProduct,
        spec: &ValidatedSpec,
    ) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.into();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
                .set(&db_product)
                .execute(conn)?;

            if affected > 0 && !spec.is_empty() {
                upsert_spec(conn, id, spec)?;
            }

            Ok(affected)
        })
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::{
            cart_items, diamond_specs, jewelry_specs, product_images, products, watch_specs,
            wishlist_items,
        };

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(product_images::table.filter(product_images::product_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(jewelry_specs::table.filter(jewelry_specs::product_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(watch_specs::table.filter(watch_specs::product_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(diamond_specs::table.filter(diamond_specs::product_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(cart_items::table.filter(cart_items::product_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(wishlist_items::table.filter(wishlist_items::product_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(products::table.filter(products::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }

    fn add_product_image(
        &self,
        product_id: ProductId,
        path: &ImagePath,
    ) -> RepositoryResult<ProductImage> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let created = conn.transaction(|conn| {
            let last_position: Option<i32> = product_images::table
                .filter(product_images::product_id.eq(product_id.get()))
                .select(diesel::dsl::max(product_images::position))
                .first(conn)?;

            diesel::insert_into(product_images::table)
                .values(NewProductImage {
                    product_id: product_id.get(),
                    path: path.as_str().to_string(),
                    position: last_position.map_or(0, |p| p + 1),
                })
                .returning(DbProductImage::as_returning())
                .get_result::<DbProductImage>(conn)
        })?;

        Ok(created.try_into()?)
    }

    fn delete_product_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> RepositoryResult<Option<ImagePath>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            product_images::table
                .filter(product_images::id.eq(image_id.get()))
                .filter(product_images::product_id.eq(product_id.get())),
        )
        .returning(product_images::path)
        .get_result::<String>(&mut conn)
        .optional()?;

        Ok(deleted.map(ImagePath::new).transpose()?)
    }
}
