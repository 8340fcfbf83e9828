//! Pure SC-100 field table: submission in, `(PDF field name, value)` pairs out.
//!
//! Nothing here touches a PDF. The filler applies the table to a template and
//! skips names the template does not contain.

use crate::submission::{parse_amount, FormSubmission};
use crate::types::JurisdictionReason;

/// Fully-qualified AcroForm field names of the Judicial Council SC-100.
pub mod fields {
    // Page 1 caption
    pub const COURT_INFO: &str = "SC-100[0].Page1[0].CaptionRight[0].County[0].CourtInfo[0]";
    pub const CASE_NUMBER: &str = "SC-100[0].Page1[0].CaptionRight[0].CN[0].CaseNumber[0]";

    // Continuation headers on pages 2-5
    pub const PAGE_PARTY: [&str; 4] = [
        "SC-100[0].Page2[0].PxCaption[0].Plaintiff[0]",
        "SC-100[0].Page3[0].PxCaption[0].Plaintiff[0]",
        "SC-100[0].Page4[0].PxCaption[0].Plaintiff[0]",
        "SC-100[0].Page5[0].PxCaption[0].Plaintiff[0]",
    ];
    pub const PAGE_CASE_NUMBER: [&str; 4] = [
        "SC-100[0].Page2[0].PxCaption[0].CaseNumber[0]",
        "SC-100[0].Page3[0].PxCaption[0].CaseNumber[0]",
        "SC-100[0].Page4[0].PxCaption[0].CaseNumber[0]",
        "SC-100[0].Page5[0].PxCaption[0].CaseNumber[0]",
    ];

    // Item 1: plaintiffs
    pub const P1_NAME: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffName1[0]";
    pub const P1_PHONE: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffPhone1[0]";
    pub const P1_STREET: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffAddress1[0]";
    pub const P1_CITY: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffCity1[0]";
    pub const P1_STATE: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffState1[0]";
    pub const P1_ZIP: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffZip1[0]";
    pub const P1_MAIL_STREET: &str =
        "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingAddress1[0]";
    pub const P1_MAIL_CITY: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingCity1[0]";
    pub const P1_MAIL_STATE: &str =
        "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingState1[0]";
    pub const P1_MAIL_ZIP: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingZip1[0]";
    pub const P1_EMAIL: &str = "SC-100[0].Page2[0].List1[0].Item1[0].EmailAdd1[0]";

    pub const P2_NAME: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffName2[0]";
    pub const P2_PHONE: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffPhone2[0]";
    pub const P2_STREET: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffAddress2[0]";
    pub const P2_CITY: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffCity2[0]";
    pub const P2_STATE: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffState2[0]";
    pub const P2_ZIP: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffZip2[0]";
    pub const P2_MAIL_STREET: &str =
        "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingAddress2[0]";
    pub const P2_MAIL_CITY: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingCity2[0]";
    pub const P2_MAIL_STATE: &str =
        "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingState2[0]";
    pub const P2_MAIL_ZIP: &str = "SC-100[0].Page2[0].List1[0].Item1[0].PlaintiffMailingZip2[0]";
    pub const P2_EMAIL: &str = "SC-100[0].Page2[0].List1[0].Item1[0].EmailAdd2[0]";

    pub const CB_MORE_PLAINTIFFS: &str = "SC-100[0].Page2[0].List1[0].Item1[0].Checkbox1[0]";
    pub const CB_FICTITIOUS: &str = "SC-100[0].Page2[0].List1[0].Item1[0].Checkbox2[0]";
    pub const CB_PAYDAY: &str = "SC-100[0].Page2[0].List1[0].Item1[0].Checkbox3[0]";

    // Item 2: defendant
    pub const D_NAME: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantName1[0]";
    pub const D_PHONE: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantPhone1[0]";
    pub const D_STREET: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantAddress1[0]";
    pub const D_CITY: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantCity1[0]";
    pub const D_STATE: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantState1[0]";
    pub const D_ZIP: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantZip1[0]";
    pub const D_MAIL_STREET: &str =
        "SC-100[0].Page2[0].List2[0].item2[0].DefendantMailingAddress1[0]";
    pub const D_MAIL_CITY: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantMailingCity1[0]";
    pub const D_MAIL_STATE: &str =
        "SC-100[0].Page2[0].List2[0].item2[0].DefendantMailingState1[0]";
    pub const D_MAIL_ZIP: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantMailingZip1[0]";
    pub const AGENT_NAME: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantName2[0]";
    pub const AGENT_TITLE: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantJob1[0]";
    pub const AGENT_STREET: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantAddress2[0]";
    pub const AGENT_CITY: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantCity2[0]";
    pub const AGENT_STATE: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantState2[0]";
    pub const AGENT_ZIP: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantZip2[0]";
    pub const CB_MORE_DEFENDANTS: &str = "SC-100[0].Page2[0].List2[0].item2[0].Checkbox5[0]";
    pub const CB_MILITARY: &str = "SC-100[0].Page2[0].List2[0].item2[0].Checkbox6[0]";
    pub const MILITARY_NAME: &str = "SC-100[0].Page2[0].List2[0].item2[0].DefendantMilitary[0]";

    // Item 3: claim
    pub const CLAIM_AMOUNT: &str = "SC-100[0].Page2[0].List3[0].PlaintiffClaimAmount1[0]";
    pub const CLAIM_REASON: &str = "SC-100[0].Page2[0].List3[0].Lia[0]";
    pub const INCIDENT_DATE: &str = "SC-100[0].Page3[0].List3[0].Date1[0]";
    pub const INCIDENT_START: &str = "SC-100[0].Page3[0].List3[0].Date2[0]";
    pub const INCIDENT_END: &str = "SC-100[0].Page3[0].List3[0].Date3[0]";
    pub const CALCULATION: &str = "SC-100[0].Page3[0].List3[0].Lic[0].FillField2[0]";
    pub const CB_MORE_SPACE: &str = "SC-100[0].Page3[0].List3[0].Checkbox14[0]";

    // Item 4: pre-suit demand
    pub const CB_ASKED_YES: &str = "SC-100[0].Page3[0].List4[0].Item4[0].Checkbox50[0]";
    pub const CB_ASKED_NO: &str = "SC-100[0].Page3[0].List4[0].Item4[0].Checkbox50[1]";
    pub const WHY_NOT_ASKED: &str = "SC-100[0].Page3[0].List4[0].Item4[0].FillField55[0]";

    // Item 5: venue
    pub const CB_VENUE_DEFENDANT: &str = "SC-100[0].Page3[0].List5[0].Lia[0].Checkbox5cb[0]";
    pub const CB_VENUE_PROPERTY: &str = "SC-100[0].Page3[0].List5[0].Lia[0].Checkbox5cb[1]";
    pub const CB_VENUE_INJURY: &str = "SC-100[0].Page3[0].List5[0].Lia[0].Checkbox5cb[2]";
    pub const CB_VENUE_CONTRACT: &str = "SC-100[0].Page3[0].List5[0].Lia[0].Checkbox5cb[3]";
    pub const CB_VENUE_BUYER: &str = "SC-100[0].Page3[0].List5[0].Lib[0].Checkbox5cb[0]";
    pub const CB_VENUE_INSTALLMENT: &str = "SC-100[0].Page3[0].List5[0].Lic[0].Checkbox5cb[0]";
    pub const CB_VENUE_VEHICLE: &str = "SC-100[0].Page3[0].List5[0].Lid[0].Checkbox5cb[0]";
    pub const CB_VENUE_OTHER: &str = "SC-100[0].Page3[0].List5[0].Lie[0].Checkbox5cb[0]";
    pub const VENUE_OTHER_TEXT: &str = "SC-100[0].Page3[0].List5[0].Lie[0].FillField56[0]";

    // Item 6: venue ZIP
    pub const VENUE_ZIP: &str = "SC-100[0].Page3[0].List6[0].item6[0].ZipCode1[0]";

    // Item 7: attorney-client fee dispute
    pub const CB_FEE_YES: &str = "SC-100[0].Page3[0].List7[0].item7[0].Checkbox60[0]";
    pub const CB_FEE_NO: &str = "SC-100[0].Page3[0].List7[0].item7[0].Checkbox60[1]";
    pub const CB_ARBITRATION: &str = "SC-100[0].Page3[0].List7[0].item7[0].Checkbox11[0]";

    // Item 8: public entity
    pub const CB_PUBLIC_YES: &str = "SC-100[0].Page4[0].List8[0].item8[0].Checkbox61[0]";
    pub const CB_PUBLIC_NO: &str = "SC-100[0].Page4[0].List8[0].item8[0].Checkbox61[1]";
    pub const PUBLIC_CLAIM_DATE: &str = "SC-100[0].Page4[0].List8[0].item8[0].Date4[0]";

    // Item 9: more than 12 claims in 12 months
    pub const CB_TWELVE_YES: &str = "SC-100[0].Page4[0].List9[0].Item9[0].Checkbox62[0]";
    pub const CB_TWELVE_NO: &str = "SC-100[0].Page4[0].List9[0].Item9[0].Checkbox62[1]";

    // Item 10: more than two claims over $2,500 this year
    pub const CB_OVER_LIMIT_YES: &str = "SC-100[0].Page4[0].List10[0].li10[0].Checkbox63[0]";
    pub const CB_OVER_LIMIT_NO: &str = "SC-100[0].Page4[0].List10[0].li10[0].Checkbox63[1]";

    // Declaration
    pub const SIGN_DATE_1: &str = "SC-100[0].Page4[0].Sign[0].Date1[0]";
    pub const PRINT_NAME_1: &str = "SC-100[0].Page4[0].Sign[0].PlaintiffName1[0]";
    pub const SIGN_DATE_2: &str = "SC-100[0].Page4[0].Sign[0].Date2[0]";
    pub const PRINT_NAME_2: &str = "SC-100[0].Page4[0].Sign[0].PlaintiffName2[0]";
}

/// Field-name → value table for one submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMapping {
    /// Text fields. An empty value means "leave the field alone".
    pub text: Vec<(&'static str, String)>,
    /// Check boxes. `None` means the source question was unanswered.
    pub checkboxes: Vec<(&'static str, Option<bool>)>,
}

impl FieldMapping {
    fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.text.push((name, value.into().trim().to_string()));
    }

    fn check(&mut self, name: &'static str, condition: impl Into<Option<bool>>) {
        self.checkboxes.push((name, condition.into()));
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.text
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn checkbox(&self, name: &str) -> Option<Option<bool>> {
        self.checkboxes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
    }

    /// Entries the filler will actually try to write.
    pub fn attempted(&self) -> usize {
        self.text.iter().filter(|(_, v)| !v.is_empty()).count()
            + self.checkboxes.iter().filter(|(_, c)| c.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.text.len() + self.checkboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn or_else<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn only_if(condition: bool, value: &str) -> &str {
    if condition {
        value
    } else {
        ""
    }
}

fn court_block(name: &str, address: &str) -> String {
    let name = name.trim();
    let heading = if name.is_empty() || name.to_lowercase().starts_with("superior court") {
        name.to_string()
    } else {
        format!("Superior Court of California, County of {name}")
    };
    [heading.as_str(), address.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn plaintiff_names(s: &FormSubmission) -> String {
    let mut names = vec![s.plaintiff_name.trim()];
    if s.has_second_plaintiff && !s.second_plaintiff_name.trim().is_empty() {
        names.push(s.second_plaintiff_name.trim());
    }
    names.retain(|n| !n.is_empty());
    names.join("; ")
}

/// Two-decimal amount; unparsable input is passed through untouched.
fn normalize_amount(raw: &str) -> String {
    match parse_amount(raw) {
        Some(v) => format!("{v:.2}"),
        None => raw.trim().to_string(),
    }
}

/// Builds the SC-100 field table. Callers validate first; this never fails.
pub fn build_field_mapping(s: &FormSubmission) -> FieldMapping {
    use fields::*;

    let mut m = FieldMapping::default();

    // Caption
    m.set(COURT_INFO, court_block(&s.court_name, &s.court_address));
    m.set(CASE_NUMBER, s.case_number.as_str());
    let parties = plaintiff_names(s);
    for name in PAGE_PARTY {
        m.set(name, parties.as_str());
    }
    for name in PAGE_CASE_NUMBER {
        m.set(name, s.case_number.as_str());
    }

    // Plaintiff; mailing address defaults to street address
    m.set(P1_NAME, s.plaintiff_name.as_str());
    m.set(P1_PHONE, s.plaintiff_phone.as_str());
    m.set(P1_STREET, s.plaintiff_street.as_str());
    m.set(P1_CITY, s.plaintiff_city.as_str());
    m.set(P1_STATE, s.plaintiff_state.as_str());
    m.set(P1_ZIP, s.plaintiff_zip.as_str());
    m.set(P1_MAIL_STREET, or_else(&s.plaintiff_mailing_street, &s.plaintiff_street));
    m.set(P1_MAIL_CITY, or_else(&s.plaintiff_mailing_city, &s.plaintiff_city));
    m.set(P1_MAIL_STATE, or_else(&s.plaintiff_mailing_state, &s.plaintiff_state));
    m.set(P1_MAIL_ZIP, or_else(&s.plaintiff_mailing_zip, &s.plaintiff_zip));
    m.set(P1_EMAIL, s.plaintiff_email.as_str());

    // Second plaintiff, blanked when there is none
    let two = s.has_second_plaintiff;
    m.set(P2_NAME, only_if(two, &s.second_plaintiff_name));
    m.set(P2_PHONE, only_if(two, &s.second_plaintiff_phone));
    m.set(P2_STREET, only_if(two, &s.second_plaintiff_street));
    m.set(P2_CITY, only_if(two, &s.second_plaintiff_city));
    m.set(P2_STATE, only_if(two, &s.second_plaintiff_state));
    m.set(P2_ZIP, only_if(two, &s.second_plaintiff_zip));
    m.set(
        P2_MAIL_STREET,
        only_if(two, or_else(&s.second_plaintiff_mailing_street, &s.second_plaintiff_street)),
    );
    m.set(
        P2_MAIL_CITY,
        only_if(two, or_else(&s.second_plaintiff_mailing_city, &s.second_plaintiff_city)),
    );
    m.set(
        P2_MAIL_STATE,
        only_if(two, or_else(&s.second_plaintiff_mailing_state, &s.second_plaintiff_state)),
    );
    m.set(
        P2_MAIL_ZIP,
        only_if(two, or_else(&s.second_plaintiff_mailing_zip, &s.second_plaintiff_zip)),
    );
    m.set(P2_EMAIL, only_if(two, &s.second_plaintiff_email));

    m.check(CB_MORE_PLAINTIFFS, s.more_than_two_plaintiffs);
    m.check(CB_FICTITIOUS, s.fictitious_business_name);
    m.check(CB_PAYDAY, s.payday_lender);

    // Defendant
    m.set(D_NAME, s.defendant_name.as_str());
    m.set(D_PHONE, s.defendant_phone.as_str());
    m.set(D_STREET, s.defendant_street.as_str());
    m.set(D_CITY, s.defendant_city.as_str());
    m.set(D_STATE, s.defendant_state.as_str());
    m.set(D_ZIP, s.defendant_zip.as_str());
    m.set(D_MAIL_STREET, or_else(&s.defendant_mailing_street, &s.defendant_street));
    m.set(D_MAIL_CITY, or_else(&s.defendant_mailing_city, &s.defendant_city));
    m.set(D_MAIL_STATE, or_else(&s.defendant_mailing_state, &s.defendant_state));
    m.set(D_MAIL_ZIP, or_else(&s.defendant_mailing_zip, &s.defendant_zip));

    let business = s.defendant_is_business;
    m.set(AGENT_NAME, only_if(business, &s.agent_name));
    m.set(AGENT_TITLE, only_if(business, &s.agent_title));
    m.set(AGENT_STREET, only_if(business, &s.agent_street));
    m.set(AGENT_CITY, only_if(business, &s.agent_city));
    m.set(AGENT_STATE, only_if(business, &s.agent_state));
    m.set(AGENT_ZIP, only_if(business, &s.agent_zip));

    m.check(CB_MORE_DEFENDANTS, s.more_than_one_defendant);
    m.check(CB_MILITARY, s.defendant_on_military_duty);
    m.set(
        MILITARY_NAME,
        only_if(s.defendant_on_military_duty, &s.defendant_military_name),
    );

    // Claim
    m.set(CLAIM_AMOUNT, normalize_amount(&s.claim_amount));
    m.set(CLAIM_REASON, s.claim_reason.as_str());
    // A single date wins over a range
    let ranged = s.incident_date.trim().is_empty();
    m.set(INCIDENT_DATE, s.incident_date.as_str());
    m.set(INCIDENT_START, only_if(ranged, &s.incident_start_date));
    m.set(INCIDENT_END, only_if(ranged, &s.incident_end_date));
    m.set(CALCULATION, s.calculation_explanation.as_str());
    m.check(CB_MORE_SPACE, s.need_more_space);

    // Pre-suit demand; the explanation only belongs on the form after a "no"
    m.check(CB_ASKED_YES, s.asked_for_payment.yes_box());
    m.check(CB_ASKED_NO, s.asked_for_payment.no_box());
    m.set(
        WHY_NOT_ASKED,
        only_if(s.asked_for_payment.is_no(), &s.why_not_asked),
    );

    // Venue
    let venue = s.jurisdiction_reason.parse::<JurisdictionReason>().ok();
    let venue_boxes = [
        (CB_VENUE_DEFENDANT, JurisdictionReason::DefendantLives),
        (CB_VENUE_PROPERTY, JurisdictionReason::PropertyDamaged),
        (CB_VENUE_INJURY, JurisdictionReason::PlaintiffInjured),
        (CB_VENUE_CONTRACT, JurisdictionReason::ContractLocation),
        (CB_VENUE_BUYER, JurisdictionReason::BuyerContract),
        (CB_VENUE_INSTALLMENT, JurisdictionReason::RetailInstallment),
        (CB_VENUE_VEHICLE, JurisdictionReason::VehicleFinance),
        (CB_VENUE_OTHER, JurisdictionReason::Other),
    ];
    for (name, reason) in venue_boxes {
        m.check(name, venue.map(|v| v == reason));
    }
    m.set(
        VENUE_OTHER_TEXT,
        only_if(venue == Some(JurisdictionReason::Other), &s.jurisdiction_other_reason),
    );
    m.set(VENUE_ZIP, s.jurisdiction_zip.as_str());

    // Items 7-10
    m.check(CB_FEE_YES, s.attorney_fee_dispute.yes_box());
    m.check(CB_FEE_NO, s.attorney_fee_dispute.no_box());
    m.check(CB_ARBITRATION, s.arbitration_filed);
    m.check(CB_PUBLIC_YES, s.suing_public_entity.yes_box());
    m.check(CB_PUBLIC_NO, s.suing_public_entity.no_box());
    m.set(
        PUBLIC_CLAIM_DATE,
        only_if(
            s.suing_public_entity == crate::types::TriState::Yes,
            &s.public_entity_claim_date,
        ),
    );
    m.check(CB_TWELVE_YES, s.more_than_twelve_claims.yes_box());
    m.check(CB_TWELVE_NO, s.more_than_twelve_claims.no_box());
    m.check(CB_OVER_LIMIT_YES, s.claim_over_limit_count.yes_box());
    m.check(CB_OVER_LIMIT_NO, s.claim_over_limit_count.no_box());

    // Declaration; printed names default to the party names
    m.set(SIGN_DATE_1, s.signature_date.as_str());
    m.set(PRINT_NAME_1, or_else(&s.plaintiff_print_name, &s.plaintiff_name));
    m.set(
        SIGN_DATE_2,
        only_if(two, or_else(&s.second_plaintiff_signature_date, &s.signature_date)),
    );
    m.set(
        PRINT_NAME_2,
        only_if(two, or_else(&s.second_plaintiff_print_name, &s.second_plaintiff_name)),
    );

    m
}
