use crate::models::BookingView;

const HEADER: [&str; 14] = [
    "id",
    "booking_type",
    "item_name",
    "guest_name",
    "guest_email",
    "guest_phone",
    "check_in_date",
    "check_out_date",
    "number_of_guests",
    "base_price",
    "tax_amount",
    "total_price",
    "booking_status",
    "payment_status",
];

/// Quotes a field when it holds a separator, quote or line break.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line: Vec<String> = fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()))
        .collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

pub fn bookings_to_csv(views: &[BookingView]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER);

    for view in views {
        let b = &view.booking;
        push_row(
            &mut out,
            [
                b.id.clone(),
                b.booking_type.as_str().to_string(),
                view.item_name.clone().unwrap_or_default(),
                b.guest_name.clone(),
                b.guest_email.clone(),
                b.guest_phone.clone().unwrap_or_default(),
                b.check_in_date.format("%Y-%m-%d").to_string(),
                b.check_out_date.format("%Y-%m-%d").to_string(),
                b.number_of_guests.to_string(),
                format!("{:.2}", b.base_price),
                format!("{:.2}", b.tax_amount),
                format!("{:.2}", b.total_price),
                b.booking_status.as_str().to_string(),
                b.payment_status.as_str().to_string(),
            ],
        );
    }
    out
}
