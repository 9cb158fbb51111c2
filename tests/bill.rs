use chrono::{TimeZone, Utc};
use shop_ordering_api::bill::{Bill, BillLine, format_money, format_rate, render_bill};

fn sample_bill() -> Bill {
    Bill {
        shop_name: "Chai Point".into(),
        shop_address: Some("12 MG Road".into()),
        shop_phone: None,
        currency_symbol: "₹".into(),
        order_number: "ORD-20240501-ABCDEF12".into(),
        placed_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        customer_name: "Asha".into(),
        customer_phone: "9876543210".into(),
        payment_mode: "upi".into(),
        lines: vec![
            BillLine {
                name: "Masala Chai".into(),
                quantity: 2,
                unit_price: 2500,
                line_total: 5000,
            },
            BillLine {
                name: "Samosa".into(),
                quantity: 1,
                unit_price: 1250,
                line_total: 1250,
            },
        ],
        subtotal: 6250,
        tax_rate_bps: 500,
        tax_amount: 312,
        total_amount: 6562,
        notes: Some("  ".into()),
    }
}

#[test]
fn money_is_rendered_from_minor_units() {
    assert_eq!(format_money(1250, "₹"), "₹12.50");
    assert_eq!(format_money(5, "$"), "$0.05");
    assert_eq!(format_money(0, "$"), "$0.00");
    assert_eq!(format_money(-199, "$"), "-$1.99");
}

#[test]
fn tax_rate_label_drops_trailing_zeros() {
    assert_eq!(format_rate(0), "0%");
    assert_eq!(format_rate(500), "5%");
    assert_eq!(format_rate(1250), "12.5%");
    assert_eq!(format_rate(1805), "18.05%");
}

#[test]
fn bill_lists_lines_and_totals() {
    let html = render_bill(&sample_bill()).unwrap();

    assert!(html.contains("<title>Bill ORD-20240501-ABCDEF12</title>"));
    assert!(html.contains("Chai Point"));
    assert!(html.contains("12 MG Road"));
    assert!(!html.contains("Tel:"));
    assert!(html.contains("2024-05-01 09:30 UTC"));
    assert!(html.contains("Payment: UPI"));
    assert!(html.contains("Masala Chai"));
    assert!(html.contains("₹50.00"));
    assert!(html.contains("Tax (5%)"));
    assert!(html.contains("₹62.50"));
    assert!(html.contains("₹65.62"));
    assert!(!html.contains("Notes:"));
    assert!(html.contains("Thank you for your order!"));
}

#[test]
fn customer_supplied_text_is_escaped() {
    let mut bill = sample_bill();
    bill.customer_name = "<script>alert(1)</script>".into();
    bill.notes = Some("<img src=x>".into());
    bill.payment_mode = "cash".into();

    let html = render_bill(&bill).unwrap();
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img"));
    assert!(html.contains("Notes:"));
    assert!(html.contains("Payment: Cash"));
}

#[test]
fn bill_disposition_names_the_download() {
    use shop_ordering_api::routes::admin::bill_disposition;

    assert_eq!(bill_disposition("ORD-20240501-ABCDEF12", false), "inline");
    assert_eq!(
        bill_disposition("ORD-20240501-ABCDEF12", true),
        "attachment; filename=\"bill-ORD-20240501-ABCDEF12.html\""
    );
}
