/// Tests for Config

use super::*;

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.context_width, 800);
    assert_eq!(config.context_height, 600);
    assert_eq!(config.default_work_group_size, (16, 16));
}

#[test]
fn test_zero_context_size_rejected() {
    let config = Config { context_height: 0, ..Config::default() };
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_zero_units_rejected() {
    let config = Config { max_texture_units: 0, ..Config::default() };
    assert!(config.validate().is_err());

    let config = Config { max_image_units: 0, ..Config::default() };
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_work_group_rejected() {
    let config = Config { default_work_group_size: (8, 0), ..Config::default() };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("8x0"));
}

#[test]
fn test_aspect_ratio() {
    let config = Config { context_width: 1920, context_height: 1080, ..Config::default() };
    assert!((config.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
}
