use diesel::prelude::*;

use crate::domain::product_type::ProductType;
use crate::domain::types::ProductTypeId;
use crate::models::product_type::ProductType as DbProductType;
use crate::repository::{DieselRepository, ProductTypeReader, RepositoryResult};

impl ProductTypeReader for DieselRepository {
    fn list_product_types(&self) -> RepositoryResult<Vec<ProductType>> {
        use crate::schema::product_types;

        let mut conn = self.conn()?;

        let items = product_types::table
            .order(product_types::name.asc())
            .select(DbProductType::as_select())
            .load::<DbProductType>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ProductType>, _>>()?;

        Ok(items)
    }

    fn get_product_type_by_id(&self, id: ProductTypeId) -> RepositoryResult<Option<ProductType>> {
        use crate::schema::product_types;

        let mut conn = self.conn()?;

        let product_type = product_types::table
            .filter(product_types::id.eq(id.get()))
            .select(DbProductType::as_select())
            .first::<DbProductType>(&mut conn)
            .optional()?;

        Ok(product_type.map(TryInto::try_into).transpose()?)
    }
}
