use super::*;

fn card_draft() -> CheckoutDraft {
    CheckoutDraft {
        order_type: Some(OrderType::Takeaway),
        payment_method: Some(PaymentMethod::Card),
        contact: ContactFields {
            email: "ada@example.com".to_string(),
            phone: "9876543210".to_string(),
        },
        card: CardFields {
            number: "4111 1111 1111 1111".to_string(),
            holder_name: "Ada Lovelace".to_string(),
            expiry: "08/29".to_string(),
            cvv: "123".to_string(),
        },
        ..CheckoutDraft::default()
    }
}

fn fields(errors: &ValidationErrors) -> Vec<DraftField> {
    errors.0.iter().map(|e| e.field).collect()
}

#[test]
fn complete_card_draft_is_valid() {
    assert!(card_draft().validate().is_ok());
}

#[test]
fn missing_order_type_is_reported_even_when_everything_else_is_filled() {
    let mut draft = card_draft();
    draft.order_type = None;
    let errors = draft.validate().unwrap_err();
    assert_eq!(fields(&errors), vec![DraftField::OrderType]);
    assert_eq!(
        errors.for_field(DraftField::OrderType).map(|e| e.message),
        Some("Please select an order type.")
    );
}

#[test]
fn empty_draft_reports_required_fields() {
    let errors = CheckoutDraft::default().validate().unwrap_err();
    assert_eq!(
        fields(&errors),
        vec![
            DraftField::OrderType,
            DraftField::PaymentMethod,
            DraftField::Email,
            DraftField::Phone,
        ]
    );
}

#[test]
fn whitespace_contact_fields_count_as_empty() {
    let mut draft = card_draft();
    draft.contact.email = "   ".to_string();
    let errors = draft.validate().unwrap_err();
    assert_eq!(fields(&errors), vec![DraftField::Email]);
}

#[test]
fn delivery_requires_address_fields() {
    let mut draft = card_draft();
    draft.order_type = Some(OrderType::Delivery);
    let errors = draft.validate().unwrap_err();
    assert_eq!(
        fields(&errors),
        vec![DraftField::Street, DraftField::City, DraftField::PostalCode]
    );

    draft.delivery = DeliveryFields {
        street: "12 Bean St".to_string(),
        city: "Pune".to_string(),
        postal_code: "411001".to_string(),
    };
    assert!(draft.validate().is_ok());
}

#[test]
fn address_fields_are_ignored_for_dine_in() {
    let mut draft = card_draft();
    draft.order_type = Some(OrderType::DineIn);
    draft.delivery = DeliveryFields::default();
    assert!(draft.validate().is_ok());
}

#[test]
fn malformed_card_fields_are_each_reported() {
    let mut draft = card_draft();
    draft.card = CardFields {
        number: "4111-abc".to_string(),
        holder_name: String::new(),
        expiry: "13/29".to_string(),
        cvv: "12".to_string(),
    };
    let errors = draft.validate().unwrap_err();
    assert_eq!(
        fields(&errors),
        vec![
            DraftField::CardNumber,
            DraftField::CardHolder,
            DraftField::CardExpiry,
            DraftField::CardCvv,
        ]
    );
}

#[test]
fn upi_requires_well_formed_id() {
    let mut draft = card_draft();
    draft.payment_method = Some(PaymentMethod::Upi);
    draft.card = CardFields::default();
    draft.upi.upi_id = "not-an-id".to_string();
    let errors = draft.validate().unwrap_err();
    assert_eq!(fields(&errors), vec![DraftField::UpiId]);

    draft.upi.upi_id = "ada.l@okbank".to_string();
    assert!(draft.validate().is_ok());
}

#[test]
fn apple_pay_needs_no_extra_fields() {
    let mut draft = card_draft();
    draft.payment_method = Some(PaymentMethod::ApplePay);
    draft.card = CardFields::default();
    assert!(draft.validate().is_ok());
}

#[test]
fn order_type_parses_aliases() {
    assert_eq!("dine-in".parse::<OrderType>(), Ok(OrderType::DineIn));
    assert_eq!("Takeaway".parse::<OrderType>(), Ok(OrderType::Takeaway));
    assert!(matches!(
        "drive-thru".parse::<OrderType>(),
        Err(CoreError::InvalidOrderType(_))
    ));
}

#[test]
fn payment_method_serializes_backend_identifiers() {
    assert_eq!(
        serde_json::to_string(&PaymentMethod::Upi).unwrap(),
        "\"UPI\""
    );
    assert_eq!(
        serde_json::to_string(&PaymentMethod::ApplePay).unwrap(),
        "\"apple\""
    );
    assert_eq!("applepay".parse::<PaymentMethod>(), Ok(PaymentMethod::ApplePay));
}

#[test]
fn card_debug_output_hides_number_and_cvv() {
    let debug = format!("{:?}", card_draft().card);
    assert!(!debug.contains("4111"));
    assert!(!debug.contains("123"));
}

#[test]
fn format_card_number_groups_digits() {
    assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
    assert_eq!(format_card_number("4111-1111 11"), "4111 1111 11");
    assert_eq!(
        format_card_number("4111111111111111999"),
        "4111 1111 1111 1111 999"
    );
    assert_eq!(format_card_number(" 4111 11x1 "), "4111 11x1");
}

#[test]
fn one_line_address_joins_parts() {
    let delivery = DeliveryFields {
        street: " 12 Bean St ".to_string(),
        city: "Pune".to_string(),
        postal_code: "411001".to_string(),
    };
    assert_eq!(delivery.one_line(), "12 Bean St, Pune, 411001");
}

#[test]
fn formatted_card_number_keeps_the_length_validation_sees() {
    let mut draft = card_draft();

    draft.card.number = format_card_number("4111111111111111999");
    assert!(draft.validate().is_ok(), "19 digits is a valid length");

    draft.card.number = format_card_number("41111111111111119999");
    assert_eq!(draft.card.number, "4111 1111 1111 1111 9999");
    let errors = draft.validate().unwrap_err();
    assert!(errors.for_field(DraftField::CardNumber).is_some());

    draft.card.number = format_card_number("4111 1111 1111 111a");
    let errors = draft.validate().unwrap_err();
    assert!(errors.for_field(DraftField::CardNumber).is_some());
}
