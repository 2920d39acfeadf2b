use std::collections::HashMap;
use std::io::Write;

use starknet_rpc_client::objects::felt::{Felt, Nonce};
use starknet_rpc_client::StarknetProvider;
use tracing::{debug, info};

use crate::account::SingleOwnerAccount;
use crate::artifacts::ContractClasses;
use crate::errors::{ScriptCommandError, StarknetCommandError};
use crate::response::ScriptResponse;
use crate::script::{ExpectedError, Script, ScriptError, Step};
use crate::starknet_commands::declare::{declare, DeclareParams};

/// Runs the steps of a script in order and stops at the first failed one. Every expected error
/// is printed to `output` as soon as it is observed, before it is compared.
pub struct ScriptRunner<'a, P, C, W> {
    account: &'a SingleOwnerAccount<P>,
    contracts: &'a C,
    params: DeclareParams,
    nonces: HashMap<String, Nonce>,
    output: &'a mut W,
}

impl<'a, P: StarknetProvider, C: ContractClasses, W: Write> ScriptRunner<'a, P, C, W> {
    pub fn new(
        account: &'a SingleOwnerAccount<P>,
        contracts: &'a C,
        params: DeclareParams,
        output: &'a mut W,
    ) -> Self {
        ScriptRunner { account, contracts, params, nonces: HashMap::new(), output }
    }

    pub async fn run(mut self, script: &Script) -> Result<ScriptResponse, ScriptError> {
        for (index, step) in script.steps.iter().enumerate() {
            let step_number = index + 1;
            debug!(step = step_number, ?step, "Running script step.");
            match step {
                Step::GetNonce { block_id, bind } => {
                    let nonce = self.account.get_nonce(*block_id).await.map_err(|error| {
                        ScriptError::CommandFailed {
                            step: step_number,
                            error: StarknetCommandError::from(error).into(),
                        }
                    })?;
                    info!("Bound {bind} = {nonce}.");
                    self.nonces.insert(bind.clone(), nonce);
                }
                Step::Declare { contract_name, max_fee, nonce, expect_error } => {
                    let nonce = nonce
                        .as_ref()
                        .map(|name| self.bound_nonce(step_number, name))
                        .transpose()?;
                    let result = self.declare(contract_name, *max_fee, nonce).await;
                    self.check(step_number, result, expect_error.as_ref())?;
                }
            }
        }
        Ok(ScriptResponse { steps_run: script.steps.len() })
    }

    fn bound_nonce(&self, step: usize, name: &str) -> Result<Nonce, ScriptError> {
        self.nonces
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::UnknownBinding { step, name: name.to_owned() })
    }

    async fn declare(
        &self,
        contract_name: &str,
        max_fee: Option<Felt>,
        nonce: Option<Nonce>,
    ) -> Result<(), ScriptCommandError> {
        let response =
            declare(contract_name, max_fee, nonce, self.account, self.contracts, &self.params)
                .await?;
        info!(
            "Declared {contract_name}: class hash {}, transaction hash {}.",
            response.class_hash, response.transaction_hash
        );
        Ok(())
    }

    fn check(
        &mut self,
        step: usize,
        result: Result<(), ScriptCommandError>,
        expected: Option<&ExpectedError>,
    ) -> Result<(), ScriptError> {
        match (result, expected) {
            (Ok(()), None) => Ok(()),
            (Err(error), None) => Err(ScriptError::CommandFailed { step, error }),
            (Ok(()), Some(ExpectedError { error, .. })) => {
                Err(ScriptError::UnexpectedSuccess { step, expected: error.clone() })
            }
            (Err(actual), Some(ExpectedError { error, message })) => {
                writeln!(self.output, "{actual:?}")?;
                if actual == *error {
                    return Ok(());
                }
                Err(ScriptError::AssertionFailed {
                    step,
                    message: message.clone(),
                    expected: error.clone(),
                    actual,
                })
            }
        }
    }
}
