//! Customer registration validation and lifecycle guards.

use rust_decimal::Decimal;

use super::error::CustomerError;
use super::types::CustomerInput;

/// Validates a customer registration or update.
///
/// The CPF checksum is supplied by the caller so this module stays free of
/// locale concerns; `fiado_shared::cpf::validate_cpf` is the production
/// implementation.
///
/// # Errors
///
/// Returns an error if the name is too short, the CPF fails validation,
/// or the credit limit is negative.
pub fn validate_customer_input<F>(
    input: &CustomerInput,
    cpf_is_valid: F,
) -> Result<(), CustomerError>
where
    F: Fn(&str) -> bool,
{
    if input.name.trim().chars().count() < 2 {
        return Err(CustomerError::NameTooShort);
    }

    if let Some(cpf) = input.cpf.as_deref()
        && !cpf.trim().is_empty()
        && !cpf_is_valid(cpf)
    {
        return Err(CustomerError::InvalidCpf(cpf.to_string()));
    }

    if let Some(limit) = input.credit_limit
        && limit < Decimal::ZERO
    {
        return Err(CustomerError::NegativeCreditLimit);
    }

    Ok(())
}

/// Guards deactivation: a customer with open sales stays active.
///
/// # Errors
///
/// Returns `HasOpenSales` when any open sale is outstanding.
pub fn ensure_can_deactivate(open_sales: u64) -> Result<(), CustomerError> {
    if open_sales > 0 {
        return Err(CustomerError::HasOpenSales { open_sales });
    }
    Ok(())
}

/// Guards deletion: a customer with any sale on record cannot be deleted.
///
/// # Errors
///
/// Returns `HasSaleHistory` when the customer has sales, paid or open.
pub fn ensure_can_delete(total_sales: u64) -> Result<(), CustomerError> {
    if total_sales > 0 {
        return Err(CustomerError::HasSaleHistory { total_sales });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiado_shared::cpf::validate_cpf;
    use rust_decimal_macros::dec;

    fn input(name: &str, cpf: Option<&str>, limit: Option<Decimal>) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            cpf: cpf.map(ToString::to_string),
            phone: None,
            address: None,
            credit_limit: limit,
            notes: None,
        }
    }

    #[test]
    fn test_valid_input() {
        let input = input("Maria Silva", Some("529.982.247-25"), Some(dec!(500.00)));
        assert!(validate_customer_input(&input, validate_cpf).is_ok());
    }

    #[test]
    fn test_name_too_short() {
        let input = input(" a ", None, None);
        assert_eq!(
            validate_customer_input(&input, validate_cpf),
            Err(CustomerError::NameTooShort)
        );
    }

    #[test]
    fn test_invalid_cpf_rejected() {
        let input = input("Maria Silva", Some("111.111.111-11"), None);
        assert!(matches!(
            validate_customer_input(&input, validate_cpf),
            Err(CustomerError::InvalidCpf(_))
        ));
    }

    #[test]
    fn test_blank_cpf_is_treated_as_absent() {
        let input = input("Maria Silva", Some("  "), None);
        assert!(validate_customer_input(&input, validate_cpf).is_ok());
    }

    #[test]
    fn test_negative_limit_rejected() {
        let input = input("Maria Silva", None, Some(dec!(-1.00)));
        assert_eq!(
            validate_customer_input(&input, validate_cpf),
            Err(CustomerError::NegativeCreditLimit)
        );
    }

    #[test]
    fn test_lifecycle_guards() {
        assert!(ensure_can_deactivate(0).is_ok());
        assert_eq!(
            ensure_can_deactivate(2),
            Err(CustomerError::HasOpenSales { open_sales: 2 })
        );
        assert!(ensure_can_delete(0).is_ok());
        assert_eq!(
            ensure_can_delete(7),
            Err(CustomerError::HasSaleHistory { total_sales: 7 })
        );
    }
}
