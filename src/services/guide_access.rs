use crate::database::models::Booking;

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A claimed identity matches a booking when the guest's first and last name
/// are equal after trimming and case folding. Cancelled stays never match.
pub fn guest_matches(booking: &Booking, first_name: &str, last_name: &str) -> bool {
    if booking.is_cancelled() {
        return false;
    }
    match (&booking.guest_first_name, &booking.guest_last_name) {
        (Some(first), Some(last)) => {
            normalize(first) == normalize(first_name) && normalize(last) == normalize(last_name)
        }
        _ => false,
    }
}

pub fn find_guest_booking<'a>(bookings: &'a [Booking], first_name: &str, last_name: &str) -> Option<&'a Booking> {
    bookings.iter().find(|b| guest_matches(b, first_name, last_name))
}
