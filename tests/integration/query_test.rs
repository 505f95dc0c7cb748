use chrono::NaiveDate;
use rowmap::{ReportDefinition, ReportRow, Selection, VariableValue};

use crate::utils::{
    Call, DEFAULT_DESIGNATION, DEFAULT_DESIGNATION_ROWS, Donation, DonationSelection,
    OTHER_DESIGNATION_ROWS, OTHER_DESIGNATION, manager, records_between,
};

/// Without variables the report runs with its stored default designation
#[test]
fn test_unfiltered_query_uses_stored_defaults() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;

    let rows = manager
        .create_query(&definition)?
        .with_selection(&DonationSelection::default())?
        .get_result_list()?;

    assert_eq!(rows.len(), DEFAULT_DESIGNATION_ROWS);
    assert!(rows.iter().all(|row| row.designation_number == DEFAULT_DESIGNATION));

    let calls = manager.service().calls();
    let Some(Call::ExecuteReport { params, format, .. }) = calls.first() else {
        panic!("expected a report execution, got {calls:?}");
    };
    assert!(params.is_empty());
    assert_eq!(*format, rowmap::OutputFormat::RowsetSchemaAndData);
    Ok(())
}

#[test]
fn test_designation_variable_is_applied() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;

    let rows = manager
        .create_query(&definition)?
        .with_selection(&DonationSelection::designation(OTHER_DESIGNATION))?
        .get_result_list()?;

    assert_eq!(rows.len(), OTHER_DESIGNATION_ROWS);
    assert!(rows.iter().all(|row| row.designation_number == OTHER_DESIGNATION));
    Ok(())
}

/// Both ends of a date range are inclusive
#[test]
fn test_date_range_is_inclusive() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;
    let start = NaiveDate::from_ymd_opt(2012, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2012, 6, 30).unwrap();
    let selection = DonationSelection {
        start_date: Some(start),
        end_date: Some(end),
        ..DonationSelection::default()
    };

    let query = manager.create_query(&definition)?.with_selection(&selection)?;
    assert_eq!(
        query.params().get("transactionStartDate"),
        Some(&VariableValue::Text("date '2012-03-01'".to_string()))
    );

    let rows = query.get_result_list()?;
    let expected = records_between(start, end);
    assert!(!rows.is_empty());
    assert_eq!(rows.len(), expected.len());
    for row in &rows {
        let date = row.transaction_date.unwrap();
        assert!(date >= start && date <= end, "{date} is outside the range");
    }
    Ok(())
}

#[test]
fn test_max_results_caps_the_rows() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;

    let rows = manager
        .create_query(&definition)?
        .set_max_results(1000)
        .get_result_list()?;

    assert_eq!(rows.len(), 1000);

    // The rest of the unfinished query is cancelled on the server
    let calls = manager.service().calls();
    assert!(calls.iter().any(|call| matches!(call, Call::CancelQuery(_))));
    let Some(Call::ExecuteReport { options, .. }) = calls.first() else {
        panic!("expected a report execution, got {calls:?}");
    };
    assert_eq!(options.max_rows_per_page, Some(1000));
    assert!(options.asynchronous);
    Ok(())
}

#[test]
fn test_no_matching_rows_is_an_empty_list() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;

    let rows = manager
        .create_query(&definition)?
        .with_selection(&DonationSelection::designation("9999999"))?
        .get_result_list()?;

    assert!(rows.is_empty());
    Ok(())
}

/// Empty cells become `None` and decimals carry the declared scale
#[test]
fn test_values_are_converted() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;

    let rows = manager.create_query(&definition)?.get_result_list()?;

    // The first generated record has no account name
    let first = &rows[0];
    assert_eq!(first.account_name, None);
    assert_eq!(first.account_number, "000400000");
    assert_eq!(first.transaction_date, NaiveDate::from_ymd_opt(2012, 1, 1));
    assert_eq!(first.amount.unwrap().scale(), 2);
    assert_eq!(first.number_of_transaction_items, Some(1));

    assert_eq!(rows[1].account_name.as_deref(), Some("Donor 0001"));
    Ok(())
}

#[test]
fn test_single_result() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;

    let row = manager
        .create_query(&definition)?
        .set_max_results(1)
        .get_single_result()?;
    assert_eq!(row.designation_number, DEFAULT_DESIGNATION);

    let none = manager
        .create_query(&definition)?
        .with_selection(&DonationSelection::designation("9999999"))?
        .get_single_result()
        .unwrap_err();
    assert!(none.is_data_retrieval());
    assert!(none.to_string().contains("No rows were returned"));

    let many = manager
        .create_query(&definition)?
        .get_single_result()
        .unwrap_err();
    assert!(many.to_string().contains("More than one row was returned"));
    assert!(many.to_string().contains(&format!("{DEFAULT_DESIGNATION_ROWS} rows")));
    Ok(())
}

#[derive(Debug, Default, Selection)]
struct Unmarked {
    #[allow(dead_code)]
    designation_number: Option<String>,
}

#[test]
fn test_selection_without_variables_is_a_configuration_error() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;

    let err = manager
        .create_query(&definition)?
        .with_selection(&Unmarked::default())
        .err()
        .unwrap();
    assert!(err.is_configuration());
    Ok(())
}

#[test]
fn test_fault_names_report_and_variables() -> rowmap::Result<()> {
    let manager = manager();
    let definition = ReportDefinition::from_columns("/shared/Reports/Missing", Donation::columns())?;

    let err = manager
        .create_query(&definition)?
        .with_selection(&DonationSelection::designation(DEFAULT_DESIGNATION))?
        .get_result_list()
        .unwrap_err();

    let message = err.to_string();
    assert!(err.is_data_retrieval());
    assert!(message.contains("unable to query report /shared/Reports/Missing"));
    assert!(message.contains("designationNumber=0478406"));
    assert!(message.contains("Path not found"));
    Ok(())
}

#[test]
fn test_transport_failure_is_a_data_retrieval_error() -> rowmap::Result<()> {
    let manager = manager();
    let definition = Donation::definition()?;
    manager.service().set_transport_down(true);

    let err = manager.create_query(&definition)?.get_result_list().unwrap_err();
    assert!(err.is_data_retrieval());
    assert!(err.to_string().contains("unable to query report"));
    Ok(())
}
