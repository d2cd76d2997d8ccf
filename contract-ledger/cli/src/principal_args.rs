use contract_ledger_core::Principal;

#[derive(clap::Args, Debug)]
pub struct PrincipalArgs {
    /// Specify the principal (e.g. a wallet address) that the ledger records as the author of
    /// this change.
    #[arg(
        name = "principal",
        env = "CONTRACT_LEDGER_PRINCIPAL",
        short,
        long,
        value_name = "PRINCIPAL"
    )]
    pub principal: Principal,
}
