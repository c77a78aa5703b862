/// Implements `FromSql` for enums stored as SMALLINT.
/// The enum must implement `TryFrom<i16, Error = DatabaseTypeError>`.
macro_rules! int_enum_from_sql {
    ($t: ty) => {
        impl<'a> postgres_types::FromSql<'a> for $t {
            fn from_sql(
                ty: &postgres_types::Type,
                raw: &'a [u8],
            ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
                let int_value: i16 =
                    <i16 as postgres_types::FromSql>::from_sql(ty, raw)?;
                let value = Self::try_from(int_value)?;
                Ok(value)
            }

            postgres_types::accepts!(INT2);
        }
    };
}

pub(crate) use int_enum_from_sql;
