use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::spec::{
    DiamondSpec, DiamondSpecFields, JewelrySpec, JewelrySpecFields, ValidatedSpec, WatchSpec,
    WatchSpecFields,
};
use crate::domain::types::ProductId;
use crate::models::spec::{
    DiamondSpec as DbDiamondSpec, DiamondSpecChangeset, JewelrySpec as DbJewelrySpec,
    JewelrySpecChangeset, NewDiamondSpec, NewJewelrySpec, NewWatchSpec,
    WatchSpec as DbWatchSpec, WatchSpecChangeset,
};
use crate::repository::{DieselRepository, RepositoryResult, SpecReader, SpecWriter};

fn upsert_jewelry(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    fields: &JewelrySpecFields,
) -> QueryResult<usize> {
    use crate::schema::jewelry_specs;

    diesel::insert_into(jewelry_specs::table)
        .values(NewJewelrySpec::new(product_id, fields))
        .on_conflict(jewelry_specs::product_id)
        .do_update()
        .set(JewelrySpecChangeset::from(fields))
        .execute(conn)
}

fn upsert_watch(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    fields: &WatchSpecFields,
) -> QueryResult<usize> {
    use crate::schema::watch_specs;

    diesel::insert_into(watch_specs::table)
        .values(NewWatchSpec::new(product_id, fields))
        .on_conflict(watch_specs::product_id)
        .do_update()
        .set(WatchSpecChangeset::from(fields))
        .execute(conn)
}

fn upsert_diamond(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    fields: &DiamondSpecFields,
) -> QueryResult<usize> {
    use crate::schema::diamond_specs;

    diesel::insert_into(diamond_specs::table)
        .values(NewDiamondSpec::new(product_id, fields))
        .on_conflict(diamond_specs::product_id)
        .do_update()
        .set(DiamondSpecChangeset::from(fields))
        .execute(conn)
}

/// Upsert a validated spec on an open connection, e.g. inside a product
/// update transaction. The `huid` index still rejects duplicates here.
pub(super) fn upsert_spec(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    spec: &ValidatedSpec,
) -> QueryResult<usize> {
    match spec {
        ValidatedSpec::Jewelry(fields) => upsert_jewelry(conn, product_id, fields),
        ValidatedSpec::Watch(fields) => upsert_watch(conn, product_id, fields),
        ValidatedSpec::Diamond(fields) => upsert_diamond(conn, product_id, fields),
    }
}

impl SpecReader for DieselRepository {
    fn get_jewelry_spec(&self, product_id: ProductId) -> RepositoryResult<Option<JewelrySpec>> {
        use crate::schema::jewelry_specs;

        let mut conn = self.conn()?;

        let spec = jewelry_specs::table
            .filter(jewelry_specs::product_id.eq(product_id.get()))
            .select(DbJewelrySpec::as_select())
            .first::<DbJewelrySpec>(&mut conn)
            .optional()?;

        Ok(spec.map(TryInto::try_into).transpose()?)
    }

    fn get_watch_spec(&self, product_id: ProductId) -> RepositoryResult<Option<WatchSpec>> {
        use crate::schema::watch_specs;

        let mut conn = self.conn()?;

        let spec = watch_specs::table
            .filter(watch_specs::product_id.eq(product_id.get()))
            .select(DbWatchSpec::as_select())
            .first::<DbWatchSpec>(&mut conn)
            .optional()?;

        Ok(spec.map(TryInto::try_into).transpose()?)
    }

    fn get_diamond_spec(&self, product_id: ProductId) -> RepositoryResult<Option<DiamondSpec>> {
        use crate::schema::diamond_specs;

        let mut conn = self.conn()?;

        let spec = diamond_specs::table
            .filter(diamond_specs::product_id.eq(product_id.get()))
            .select(DbDiamondSpec::as_select())
            .first::<DbDiamondSpec>(&mut conn)
            .optional()?;

        Ok(spec.map(TryInto::try_into).transpose()?)
    }

    fn huid_taken(&self, huid: &str, except: Option<ProductId>) -> RepositoryResult<bool> {
        use crate::schema::jewelry_specs;

        let mut conn = self.conn()?;

        let mut query = jewelry_specs::table
            .filter(jewelry_specs::huid.eq(huid))
            .into_boxed();
        if let Some(product_id) = except {
            query = query.filter(jewelry_specs::product_id.ne(product_id.get()));
        }

        let count = query.count().get_result::<i64>(&mut conn)?;
        Ok(count > 0)
    }
}

impl SpecWriter for DieselRepository {
    fn create_jewelry_spec(
        &self,
        product_id: ProductId,
        fields: &JewelrySpecFields,
    ) -> RepositoryResult<usize> {
        use crate::schema::jewelry_specs;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(jewelry_specs::table)
            .values(NewJewelrySpec::new(product_id, fields))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn upsert_jewelry_spec(
        &self,
        product_id: ProductId,
        fields: &JewelrySpecFields,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        Ok(upsert_jewelry(&mut conn, product_id, fields)?)
    }

    fn create_watch_spec(
        &self,
        product_id: ProductId,
        fields: &WatchSpecFields,
    ) -> RepositoryResult<usize> {
        use crate::schema::watch_specs;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(watch_specs::table)
            .values(NewWatchSpec::new(product_id, fields))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn upsert_watch_spec(
        &self,
        product_id: ProductId,
        fields: &WatchSpecFields,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        Ok(upsert_watch(&mut conn, product_id, fields)?)
    }

    fn create_diamond_spec(
        &self,
        product_id: ProductId,
        fields: &DiamondSpecFields,
    ) -> RepositoryResult<usize> {
        use crate::schema::diamond_specs;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(diamond_specs::table)
            .values(NewDiamondSpec::new(product_id, fields))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn upsert_diamond_spec(
        &self,
        product_id: ProductId,
        fields: &DiamondSpecFields,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        Ok(upsert_diamond(&mut conn, product_id, fields)?)
    }
}
