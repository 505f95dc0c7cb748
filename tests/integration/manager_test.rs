use rowmap::{
    AnalyticsManagerFactory, ConverterRegistry, ReportDefinition, ReportRow, RowmapConfig,
    RowmapError,
};

use crate::utils::{
    Call, Donation, FakeAnswersService, FakeConnector, REPORT_PATH, USERNAME, manager, test_config,
};

#[test]
fn test_wrong_credentials_fail_to_connect() {
    let config = RowmapConfig {
        password: "wrong".to_string(),
        ..test_config()
    };
    let factory = AnalyticsManagerFactory::new(FakeConnector, config);

    let err = factory.create_analytics_manager().err().unwrap();
    let RowmapError::Connection { username, source } = &err else {
        panic!("expected a connection error, got {err:?}");
    };
    assert_eq!(username, USERNAME);
    assert!(source.is_fault());
}

#[test]
fn test_fresh_manager_validates() -> rowmap::Result<()> {
    let manager = manager();
    manager.validate()?;

    // The validation report runs with a one row cap
    let calls = manager.service().calls();
    assert!(calls.contains(&Call::CurrentUser));
    assert!(calls.iter().any(|call| matches!(
        call,
        Call::ExecuteReport { path, options, .. }
            if path == REPORT_PATH && options.max_rows_per_page == Some(1)
    )));
    Ok(())
}

#[test]
fn test_recent_failure_invalidates_manager() -> rowmap::Result<()> {
    let manager = manager();
    let definition = ReportDefinition::from_columns("/shared/Reports/Missing", Donation::columns())?;

    assert!(manager.create_query(&definition)?.get_result_list().is_err());

    let err = manager.validate().unwrap_err();
    assert!(matches!(err, RowmapError::InvalidState { .. }));
    assert!(err.to_string().contains("a recent error has occurred"));
    assert!(err.to_string().contains("/shared/Reports/Missing"));
    Ok(())
}

/// A failing validation report is remembered like any other failed call
#[test]
fn test_failed_validation_report_invalidates_manager() {
    let manager = rowmap::AnalyticsManager::new(
        FakeAnswersService::new(),
        ConverterRegistry::with_defaults(),
        Some("/shared/Reports/Missing".to_string()),
    );

    let err = manager.validate().unwrap_err();
    assert!(err.is_data_retrieval());
    assert!(err.to_string().contains("unable to query report /shared/Reports/Missing"));

    let err = manager.validate().unwrap_err();
    assert!(matches!(err, RowmapError::InvalidState { .. }));
    assert!(err.to_string().contains("a recent error has occurred"));
}

#[test]
fn test_expired_session_invalidates_manager() {
    let manager = manager();
    manager.service().expire_session();

    let err = manager.validate().unwrap_err();
    assert!(matches!(err, RowmapError::InvalidState { .. }));
    assert!(err.to_string().contains("no longer usable"));
}

#[test]
fn test_closed_manager_rejects_use() -> rowmap::Result<()> {
    let mut manager = manager();
    let definition = Donation::definition()?;

    manager.close()?;
    assert!(manager.is_closed());
    assert!(manager.service().calls().contains(&Call::Logoff));

    let err = manager.create_query(&definition).err().unwrap();
    assert!(err.to_string().contains("already closed"));
    assert!(manager.validate().is_err());
    assert!(manager.close().is_err());
    Ok(())
}

/// Converters added on the factory replace the defaults for their type;
/// converters declared by the row type win over both
#[test]
fn test_converter_layers() -> rowmap::Result<()> {
    let shouting = ConverterRegistry::new()
        .with_fn::<String, _>("shouting", |text, _| Ok(text.to_uppercase()));
    let manager = AnalyticsManagerFactory::new(FakeConnector, test_config())
        .with_converters(&shouting)
        .create_analytics_manager()?;

    let definition = Donation::definition()?;
    let rows = manager.create_query(&definition)?.get_result_list()?;
    assert_eq!(rows[1].account_name.as_deref(), Some("DONOR 0001"));

    let whispering = ConverterRegistry::new()
        .with_fn::<String, _>("whispering", |text, _| Ok(text.to_lowercase()));
    let definition = Donation::definition()?.with_converters(whispering);
    let rows = manager.create_query(&definition)?.get_result_list()?;
    assert_eq!(rows[1].account_name.as_deref(), Some("donor 0001"));
    Ok(())
}

#[test]
fn test_missing_converter_is_a_configuration_error() -> rowmap::Result<()> {
    let manager = rowmap::AnalyticsManager::new(FakeAnswersService::new(), ConverterRegistry::new(), None);
    let definition = Donation::definition()?;

    let err = manager.create_query(&definition)?.get_result_list().unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("is not of a type that this system can use"));
    Ok(())
}
