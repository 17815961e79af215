// Booking session state machine. One mutable session record tracks where
// the user is and what they have selected across the search -> detail ->
// booking -> confirmation flow. Transitions are guarded so the session can
// never reach a page without the state that page requires.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::detail::HotelResolver;
use crate::model::{Hotel, Room, SearchResults};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Search,
    Hotel,
    Booking,
    Confirmation,
    Contact,
    Terms,
    Privacy,
    Admin,
    Login,
    Register,
    ForgotPassword,
    UpdatePassword,
}

impl Page {
    // Pages whose identity is mirrored in the address-bar fragment. All
    // other pages are session-only and never appear there.
    pub fn is_fragment_backed(self) -> bool {
        matches!(
            self,
            Page::Admin | Page::Login | Page::Register | Page::ForgotPassword | Page::UpdatePassword
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Search => "search",
            Page::Hotel => "hotel",
            Page::Booking => "booking",
            Page::Confirmation => "confirmation",
            Page::Contact => "contact",
            Page::Terms => "terms",
            Page::Privacy => "privacy",
            Page::Admin => "admin",
            Page::Login => "login",
            Page::Register => "register",
            Page::ForgotPassword => "forgot-password",
            Page::UpdatePassword => "update-password",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Page::Home),
            "search" => Some(Page::Search),
            "hotel" => Some(Page::Hotel),
            "booking" => Some(Page::Booking),
            "confirmation" => Some(Page::Confirmation),
            "contact" => Some(Page::Contact),
            "terms" => Some(Page::Terms),
            "privacy" => Some(Page::Privacy),
            "admin" => Some(Page::Admin),
            "login" => Some(Page::Login),
            "register" => Some(Page::Register),
            "forgot-password" => Some(Page::ForgotPassword),
            "update-password" => Some(Page::UpdatePassword),
            _ => None,
        }
    }
}

// The single mutable record owned by the session manager. Empty strings
// stand for "not set" on the id and reference fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub page: Page,
    pub selected_hotel_id: String,
    pub selected_hotel: Option<Hotel>,
    pub search_results: Option<SearchResults>,
    pub selected_rooms: Vec<Room>,
    pub booking_reference: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            page: Page::Home,
            selected_hotel_id: String::new(),
            selected_hotel: None,
            search_results: None,
            selected_rooms: Vec::new(),
            booking_reference: String::new(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("hotel id must not be empty")]
    EmptyHotelId,

    #[error("room selection must not be empty")]
    NoRoomsSelected,

    #[error("booking reference must not be empty")]
    EmptyReference,
}

type Observer = Box<dyn Fn(&Session)>;

// Owns the session record and runs every transition to completion before
// notifying observers. Single-threaded by design; the presentation layer
// subscribes and re-renders on change.
#[derive(Default)]
pub struct BookingSession {
    session: Session,
    observers: Vec<Observer>,
}

impl BookingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subscribe(&mut self, observer: impl Fn(&Session) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.session);
        }
    }

    pub fn search(&mut self) {
        self.session.page = Page::Search;
        self.notify();
    }

    // Retains the last result set so returning from a detail page does not
    // force a re-search.
    pub fn store_results(&mut self, results: SearchResults) {
        self.session.search_results = Some(results);
        self.notify();
    }

    pub fn view_hotel(&mut self, hotel_id: &str) -> Result<(), SessionError> {
        if hotel_id.trim().is_empty() {
            return Err(SessionError::EmptyHotelId);
        }
        self.session.selected_hotel_id = hotel_id.to_string();
        self.session.page = Page::Hotel;
        self.notify();
        Ok(())
    }

    pub fn book_room(&mut self, hotel: Hotel, room: Room) -> Result<(), SessionError> {
        self.book_rooms(hotel, vec![room])
    }

    pub fn book_rooms(&mut self, hotel: Hotel, rooms: Vec<Room>) -> Result<(), SessionError> {
        if rooms.is_empty() {
            return Err(SessionError::NoRoomsSelected);
        }
        self.session.selected_hotel_id = hotel.id.clone();
        self.session.selected_hotel = Some(hotel);
        self.session.selected_rooms = rooms;
        self.session.page = Page::Booking;
        self.notify();
        Ok(())
    }

    // Deferred booking transition for when only a hotel id is known, e.g.
    // returning from a bookmarked detail view. Resolution runs out of band;
    // the effect applies only if it succeeds and the selection is still the
    // one the resolution was keyed by. A stale or failed resolution is a
    // no-op, never partial booking state. Returns whether the transition
    // was applied.
    pub async fn book_rooms_by_id<R: HotelResolver + ?Sized>(
        &mut self,
        resolver: &R,
        rooms: Vec<Room>,
    ) -> Result<bool, SessionError> {
        if rooms.is_empty() {
            return Err(SessionError::NoRoomsSelected);
        }

        if let Some(hotel) = self.session.selected_hotel.clone() {
            self.book_rooms(hotel, rooms)?;
            return Ok(true);
        }

        let requested = self.session.selected_hotel_id.clone();
        if requested.is_empty() {
            return Err(SessionError::EmptyHotelId);
        }

        let resolved = resolver.hotel_details(&requested).await;

        // The user may have moved on while the request was in flight.
        if self.session.selected_hotel_id != requested {
            debug!(hotel_id = %requested, "selection changed during resolution, dropping result");
            return Ok(false);
        }

        match resolved {
            Some(hotel) => {
                self.book_rooms(hotel, rooms)?;
                Ok(true)
            }
            None => {
                warn!(hotel_id = %requested, "hotel resolution failed, booking not started");
                Ok(false)
            }
        }
    }

    pub async fn book_room_by_id<R: HotelResolver + ?Sized>(
        &mut self,
        resolver: &R,
        room: Room,
    ) -> Result<bool, SessionError> {
        self.book_rooms_by_id(resolver, vec![room]).await
    }

    pub fn complete(&mut self, reference: &str) -> Result<(), SessionError> {
        if reference.trim().is_empty() {
            return Err(SessionError::EmptyReference);
        }
        self.session.booking_reference = reference.to_string();
        self.session.page = Page::Confirmation;
        self.notify();
        Ok(())
    }

    // Back-to-home and new-search both land here: every selection field is
    // cleared in one step, no partial reset is observable.
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.notify();
    }

    // Direct page set for session-only targets; fragment-backed targets go
    // through the navigation synchronizer instead.
    pub fn set_page(&mut self, page: Page) {
        self.session.page = page;
        self.notify();
    }
}

// Reference format delegated from the booking collaborator: "TN" plus the
// last eight digits of the current Unix millisecond timestamp.
pub fn generate_booking_reference() -> String {
    let millis = Utc::now().timestamp_millis();
    format!("TN{:08}", millis.rem_euclid(100_000_000))
}
