// Navigation synchronizer: keeps the session's active page and the
// address-bar fragment in agreement for the fragment-backed pages, and
// keeps every other page purely in memory. Fragment-change notifications
// and explicit navigations are processed in arrival order.

use tracing::debug;

use crate::session::{BookingSession, Page};

// Fixed recognition table. The admin page accepts three literal spellings;
// every entry accepts both the "#/x" and "#x" form, case-insensitively.
pub fn page_from_fragment(fragment: &str) -> Option<Page> {
    match fragment.to_lowercase().as_str() {
        "#/admin" | "#/admin/" | "#admin" => Some(Page::Admin),
        "#/login" | "#login" => Some(Page::Login),
        "#/register" | "#register" => Some(Page::Register),
        "#/forgot-password" | "#forgot-password" => Some(Page::ForgotPassword),
        "#/update-password" | "#update-password" => Some(Page::UpdatePassword),
        _ => None,
    }
}

// Fragment value written for a fragment-backed page, without the leading
// '#'. Session-only pages have no fragment representation.
pub fn fragment_for(page: Page) -> Option<&'static str> {
    match page {
        Page::Admin => Some("/admin"),
        Page::Login => Some("/login"),
        Page::Register => Some("/register"),
        Page::ForgotPassword => Some("/forgot-password"),
        Page::UpdatePassword => Some("/update-password"),
        _ => None,
    }
}

// Seam over the browser address bar. `read` returns the current fragment
// including the leading '#' (empty when none); `write` takes the value
// without the '#', where an empty value clears the fragment.
pub trait AddressBar {
    fn read(&self) -> String;
    fn write(&mut self, value: &str);
}

// In-memory bar for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct InMemoryAddressBar {
    fragment: String,
}

impl InMemoryAddressBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AddressBar for InMemoryAddressBar {
    fn read(&self) -> String {
        self.fragment.clone()
    }

    fn write(&mut self, value: &str) {
        self.fragment = if value.is_empty() {
            String::new()
        } else {
            format!("#{value}")
        };
    }
}

pub struct NavigationSync<B: AddressBar> {
    bar: B,
}

impl<B: AddressBar> NavigationSync<B> {
    pub fn new(bar: B) -> Self {
        Self { bar }
    }

    pub fn address_bar(&self) -> &B {
        &self.bar
    }

    // Explicit navigation. Fragment-backed targets are reached by writing
    // the fragment and replaying the inbound sync, so the fragment stays
    // the single source of truth for them. Session-only targets clear any
    // recognized fragment first; a stale fragment would otherwise
    // re-trigger the inbound sync later.
    pub fn navigate(&mut self, session: &mut BookingSession, target: Page) {
        if let Some(fragment) = fragment_for(target) {
            self.bar.write(fragment);
            self.sync_from_fragment(session);
            return;
        }

        if page_from_fragment(&self.bar.read()).is_some() {
            self.bar.write("");
        }
        session.set_page(target);
    }

    // Navigation by page name, as emitted by presentation-layer links.
    // Returns false when the name is not a recognized page.
    pub fn navigate_named(&mut self, session: &mut BookingSession, name: &str) -> bool {
        match Page::from_name(name) {
            Some(page) => {
                self.navigate(session, page);
                true
            }
            None => false,
        }
    }

    // Inbound sync, run at startup and on every fragment-change
    // notification (browser history, manual edits). A recognized fragment
    // forces its page. An unrecognized one falls back to home only when
    // the current page was itself fragment-backed; otherwise it must not
    // clobber in-progress session-only navigation.
    pub fn sync_from_fragment(&mut self, session: &mut BookingSession) {
        let fragment = self.bar.read();
        match page_from_fragment(&fragment) {
            Some(page) => {
                debug!(fragment = %fragment, page = page.name(), "fragment sync");
                session.set_page(page);
            }
            None => {
                if session.session().page.is_fragment_backed() {
                    debug!(fragment = %fragment, "fragment cleared, falling back to home");
                    session.set_page(Page::Home);
                }
            }
        }
    }
}
