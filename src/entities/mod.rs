use rust_decimal::Decimal;
use sea_orm::DbErr;
use validator::{Validate, ValidationError};

pub mod customer;
pub mod product;
pub mod sale_order;
pub mod sale_order_line;
pub mod sale_order_option;
pub mod sale_order_template;
pub mod sale_order_template_line;
pub mod sale_order_template_option;
pub mod translation;

/// Runs a model's `validator` rules from inside `before_save`.
pub(crate) fn validate_model<M: Validate>(model: &M) -> Result<(), DbErr> {
    model
        .validate()
        .map_err(|err| DbErr::Custom(format!("Validation error: {}", err)))
}

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Value cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_discount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("discount");
        err.message = Some("Discount must be between 0 and 100 percent".into());
        return Err(err);
    }
    Ok(())
}
