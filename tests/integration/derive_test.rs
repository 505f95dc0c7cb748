use std::collections::BTreeSet;

use rowmap::{
    CodeConverter, CodedValue, ColumnIdentity, ConverterRegistry, ReportDefinition, ReportRow,
    Selection, VariableValue,
};

use crate::utils::{Donation, FakeAnswersService, manager_with};

#[test]
fn test_column_identities() -> rowmap::Result<()> {
    let definition = Donation::definition()?;

    let identities: Vec<_> = definition
        .columns()
        .iter()
        .map(|column| column.identity().to_string())
        .collect();
    assert_eq!(
        identities,
        [
            "Designation : Designation Number",
            "Account Profile : Account Number",
            "Account Profile : Account Name",
            "Transaction : Transaction Date",
            "Transaction Item : Amount",
            "Fact - Transaction Items : # Transaction Items",
        ]
    );
    assert_eq!(definition.path(), "/shared/Reports/Donations/Designation Activity");
    assert_eq!(definition.name(), "Donation");
    Ok(())
}

#[test]
fn test_column_options() -> rowmap::Result<()> {
    let definition = Donation::definition()?;

    let designation = definition.column("designation_number")?;
    assert!(!designation.is_nullable());
    assert_eq!(designation.value_type().name(), "alloc::string::String");

    let amount = definition.column("amount")?;
    assert!(amount.is_nullable());
    assert_eq!(amount.scale(), Some(2));

    assert!(definition.column("memo").unwrap_err().is_configuration());
    Ok(())
}

#[test]
fn test_column_getters() -> rowmap::Result<()> {
    let definition = Donation::definition()?;
    let row = Donation {
        designation_number: "0478406".to_string(),
        account_name: None,
        number_of_transaction_items: Some(3),
        ..Donation::default()
    };

    let designation = definition.column("designation_number")?;
    assert_eq!(designation.value::<String>(&row).map(String::as_str), Some("0478406"));
    assert_eq!(definition.column("account_name")?.value::<String>(&row), None);
    assert_eq!(
        definition.column("number_of_transaction_items")?.value::<i32>(&row),
        Some(&3)
    );
    Ok(())
}

#[derive(Debug, Default, ReportRow)]
#[report(path = "/shared/Reports/Donations/Designation Activity")]
struct Doubled {
    #[column(table_heading = "Account Profile")]
    account_number: String,

    #[column(table_heading = "Account Profile", column_heading = "Account Number")]
    account: String,
}

#[test]
fn test_two_fields_on_one_column() {
    let err = ReportDefinition::<Doubled>::new().unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("has two fields mapped to column"));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GiftFrequency {
    OneTime,
    Monthly,
    Annual,
}

impl CodedValue for GiftFrequency {
    fn variants() -> &'static [Self] {
        &[Self::OneTime, Self::Monthly, Self::Annual]
    }

    fn code(&self) -> &'static str {
        match self {
            Self::OneTime => "1",
            Self::Monthly => "2",
            Self::Annual => "3",
        }
    }
}

fn frequency_converters() -> ConverterRegistry {
    ConverterRegistry::new().with::<GiftFrequency>(CodeConverter::<GiftFrequency>::new())
}

/// Reads the item count column as a coded value through the row type's own
/// converters
#[derive(Debug, Default, ReportRow)]
#[report(
    path = "/shared/Reports/Donations/Designation Activity",
    converters = "frequency_converters"
)]
struct DonationFrequency {
    #[column(table_heading = "Account Profile")]
    account_number: String,

    #[column(
        table_heading = "Fact - Transaction Items",
        column_heading = "# Transaction Items"
    )]
    frequency: Option<GiftFrequency>,
}

#[test]
fn test_report_converters() -> rowmap::Result<()> {
    let manager = manager_with(FakeAnswersService::new());
    let definition = DonationFrequency::definition()?;
    assert_eq!(definition.converters().len(), 1);

    let rows = manager.create_query(&definition)?.get_result_list()?;

    assert_eq!(rows[0].frequency, Some(GiftFrequency::OneTime));
    assert_eq!(rows[1].frequency, Some(GiftFrequency::Monthly));
    assert_eq!(rows[2].frequency, Some(GiftFrequency::Annual));
    assert!(!rows[0].account_number.is_empty());
    Ok(())
}

#[derive(Debug, Default, Selection)]
struct AccountSelection {
    #[param]
    accounts: BTreeSet<String>,

    #[param(name = "designationNumber")]
    designation: Option<String>,

    #[allow(dead_code)]
    note: String,
}

#[test]
fn test_selection_variables() {
    let selection = AccountSelection {
        accounts: ["000400000", "O'Brien"].into_iter().map(String::from).collect(),
        designation: None,
        note: "ignored".to_string(),
    };

    let variables = selection.report_variables();
    assert_eq!(variables.len(), 2);
    assert_eq!(
        variables[0],
        (
            "accounts",
            Some(VariableValue::Text("('000400000','O''Brien')".to_string()))
        )
    );
    assert_eq!(variables[1], ("designationNumber", None));
}

#[test]
fn test_explicit_identity_lookup() -> rowmap::Result<()> {
    let definition = Donation::definition()?;
    let column = definition.column("number_of_transaction_items")?;
    assert_eq!(
        column.identity(),
        &ColumnIdentity::new("Fact - Transaction Items", "# Transaction Items")
    );
    Ok(())
}
