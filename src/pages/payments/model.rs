use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreatePayment {
    pub(super) payroll_id: Uuid,
    pub(super) amount: Decimal,
    pub(super) payment_date: NaiveDate,
    /// Defaults to `completed` when omitted.
    pub(super) status: Option<PaymentStatus>,
    pub(super) notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct UpdatePayment {
    pub(super) amount: Option<Decimal>,
    pub(super) payment_date: Option<NaiveDate>,
    pub(super) status: Option<PaymentStatus>,
    pub(super) notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SetTotalPaid {
    pub(super) amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SetTotalPaidResponse {
    /// `None` when the amount was zero and the history was simply cleared.
    pub(super) payment: Option<payroll_payment::Model>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct BatchPaymentsRequest {
    pub(super) payroll_ids: Vec<Uuid>,
}
