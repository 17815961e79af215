// Browser-resident booking storefront core: the navigation/session state
// machine for the search -> detail -> booking -> confirmation flow, its
// two-way sync with the address-bar fragment, and the inventory
// normalization and resilient catalogue fetch layer underneath.

pub mod catalog;
pub mod detail;
pub mod model;
pub mod navigation;
pub mod normalizer;
pub mod payment;
pub mod session;

// Re-export key types for convenience
pub use catalog::{CatalogCache, CatalogTransport, ErrorContext, FetchError, HttpCatalogTransport};
pub use detail::{HotelDetailClient, HotelResolver};
pub use model::{City, Hotel, Room, SearchParams, SearchResults};
pub use navigation::{page_from_fragment, AddressBar, InMemoryAddressBar, NavigationSync};
pub use normalizer::{catalog_identifier, normalize_hotel};
pub use payment::{register_params, PaymentConfig, RegisterParams};
pub use session::{generate_booking_reference, BookingSession, Page, Session, SessionError};
