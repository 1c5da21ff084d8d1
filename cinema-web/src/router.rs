use cinema_core::models::Role;
use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/booking")]
    Booking,
    #[at("/seats/:showtime_id")]
    Seats { showtime_id: i64 },
    #[at("/booking/confirm")]
    Checkout,
    #[at("/bookings")]
    MyBookings,
    #[at("/loyalty")]
    Loyalty,
    #[at("/login")]
    Login,
    #[at("/staff/dashboard")]
    StaffDashboard,
    #[at("/admin/dashboard")]
    AdminDashboard,
    #[at("/admin/bookings")]
    CounterBooking,
    #[at("/admin/halls/layout")]
    HallLayout,
    #[at("/404")]
    #[not_found]
    NotFound,
}

const STAFF_ROLES: &[Role] = &[Role::CinemaStaff, Role::CinemaManager, Role::SystemAdmin];
const ADMIN_ROLES: &[Role] = &[Role::CinemaManager, Role::SystemAdmin];

impl Route {
    /// Roles allowed to open the route. `None` is public; an empty slice
    /// only requires a signed-in user.
    #[must_use]
    pub const fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Home
            | Self::Booking
            | Self::Seats { .. }
            | Self::Checkout
            | Self::Login
            | Self::NotFound => None,
            Self::MyBookings | Self::Loyalty => Some(&[]),
            Self::StaffDashboard | Self::CounterBooking => Some(STAFF_ROLES),
            Self::AdminDashboard | Self::HallLayout => Some(ADMIN_ROLES),
        }
    }

    /// Map a dashboard path from [`cinema_core::access::dashboard_path`].
    #[must_use]
    pub fn from_dashboard_path(path: &str) -> Self {
        Self::recognize(path).unwrap_or(Self::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_core::access::dashboard_path;

    #[test]
    fn dashboards_map_onto_routes() {
        assert_eq!(
            Route::from_dashboard_path(dashboard_path(&[Role::SystemAdmin])),
            Route::AdminDashboard
        );
        assert_eq!(
            Route::from_dashboard_path(dashboard_path(&[Role::CinemaStaff])),
            Route::StaffDashboard
        );
        assert_eq!(
            Route::from_dashboard_path(dashboard_path(&[Role::Customer])),
            Route::Home
        );
    }

    #[test]
    fn admin_pages_need_admin_roles() {
        assert_eq!(Route::HallLayout.allowed_roles(), Some(ADMIN_ROLES));
        assert_eq!(Route::Booking.allowed_roles(), None);
        assert_eq!(Route::MyBookings.allowed_roles(), Some(&[][..]));
        assert_eq!(Route::Loyalty.allowed_roles(), Some(&[][..]));
    }

    #[test]
    fn paths_round_trip() {
        assert_eq!(Route::Seats { showtime_id: 42 }.to_path(), "/seats/42");
        assert_eq!(Route::recognize("/booking/confirm"), Some(Route::Checkout));
    }
}
