//! Vendor declaration and agreement.

#[cfg(test)]
#[path = "declaration_test.rs"]
mod declaration_test;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{BusyFlag, FlowError, session_token, session_vendor_id};
use crate::app::AppContext;
use crate::gate::Route;
use crate::net::types::Declaration;

pub const DECLARATION_TEXT: &str = "
I hereby declare that:

1. All information provided during registration is true and accurate to the best of my knowledge.

2. I agree to comply with all Kriyado platform policies and guidelines.

3. I will maintain accurate inventory and pricing information.

4. I will honor all discounts and offers displayed on the platform.

5. I will provide quality products/services and maintain customer satisfaction.

6. I understand that false information may result in account suspension or termination.

7. I agree to the terms and conditions of the Kriyado vendor agreement.

8. I will respond to customer queries and complaints in a timely manner.

9. I authorize Kriyado to display my business information on the platform.

10. I agree to pay all applicable fees and commissions as per the agreement.
";

const MUST_AGREE: &str = "Please agree to the declaration before proceeding";

pub struct DeclarationFlow<'a> {
    ctx: &'a AppContext,
    busy: BusyFlag,
}

impl<'a> DeclarationFlow<'a> {
    #[must_use]
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx, busy: BusyFlag::default() }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// The signed declaration, if any.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on missing session or backend failure.
    pub async fn current(&self) -> Result<Option<Declaration>, FlowError> {
        let token = session_token(self.ctx)?;
        Ok(self.ctx.api.declarations(&token).get().await?)
    }

    /// Sign the declaration now, refresh the session and return the
    /// dashboard route.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when `agreed` is false,
    /// [`FlowError::NotAuthenticated`] without a session vendor, or the
    /// backend failure.
    pub async fn submit(&self, agreed: bool) -> Result<Route, FlowError> {
        if !agreed {
            return Err(FlowError::Validation(MUST_AGREE.to_owned()));
        }
        let token = session_token(self.ctx)?;
        let vendor = session_vendor_id(self.ctx).ok_or(FlowError::NotAuthenticated)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;

        let body = Declaration {
            vendor,
            agreed_to_terms: true,
            declaration_text: DECLARATION_TEXT.to_owned(),
            signed_date: OffsetDateTime::now_utc().format(&Rfc3339)?,
        };
        self.ctx.api.declarations(&token).submit(&body).await?;
        tracing::info!(vendor_id = %body.vendor, "declaration signed");

        self.ctx.session.refresh_user().await?;
        Ok(Route::Dashboard)
    }
}
