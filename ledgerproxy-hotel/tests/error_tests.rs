use ledgerproxy_dataset::DatasetError;
use ledgerproxy_hotel::HotelError;
use ledgerproxy_offchain::OffChainError;
use ledgerproxy_types::RemoteError;

#[test]
fn wrapped_errors_display_transparently() {
    let err: HotelError = DatasetError::UnknownField("stars".into()).into();
    assert_eq!(err.to_string(), "unknown field: stars");

    let err: HotelError = OffChainError::UnsupportedScheme("bzz-raw".into()).into();
    assert_eq!(err.to_string(), "unsupported storage scheme: `bzz-raw`");
}

#[test]
fn remote_error_display() {
    let err: HotelError = RemoteError::Rejected("not the manager".into()).into();
    assert_eq!(err.to_string(), "contract call failed: transaction rejected: not the manager");
}

#[test]
fn lifecycle_errors_display() {
    assert_eq!(HotelError::MissingUrl.to_string(), "hotel has no data index url");
    assert_eq!(HotelError::NotDeployed.to_string(), "hotel is not deployed");
    assert!(HotelError::AlreadyDeployed("0xhotel".into()).to_string().contains("0xhotel"));
}
