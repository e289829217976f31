//! Transaction form flow: selection invariants, preview, payload validation
//! and submission through a wallet stand-in

use std::fs;
use std::sync::Mutex;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone};

use timelock_codec::core::{Session, TimelockContract};
use timelock_codec::domain::abi::{AbiLibrary, AbiRecord};
use timelock_codec::domain::timelock::{eta_from_local, eta_to_local, TimelockOperation};
use timelock_codec::infrastructure::abi::decode_timelock_call;
use timelock_codec::infrastructure::AbiScanner;
use timelock_codec::modules::form::{
    FieldError, SubmitError, TransactionForm, TransactionPayload, TransactionSender,
};
use timelock_codec::modules::transactions::QueuedTransaction;

const TOKEN_ABI: &str = r#"[
    {"type":"function","name":"approve","stateMutability":"nonpayable","inputs":[
        {"name":"spender","type":"address"},{"name":"amount","type":"uint256"}]},
    {"type":"function","name":"pause","stateMutability":"nonpayable","inputs":[]},
    {"type":"function","name":"allowance","stateMutability":"view","inputs":[
        {"name":"owner","type":"address"},{"name":"spender","type":"address"}]}
]"#;

const TIMELOCK: &str = "0x2222222222222222222222222222222222222222";
const TARGET: &str = "0x3333333333333333333333333333333333333333";
const SPENDER: &str = "0x1111111111111111111111111111111111111111";

fn library() -> AbiLibrary {
    AbiLibrary::from_records(vec![
        AbiRecord::new(1, "Token", TOKEN_ABI),
        AbiRecord::new(2, "Empty", "[]"),
    ])
}

fn connected_session(chain_id: u64) -> Session {
    let mut session = Session::new();
    session.connect(Address::repeat_byte(0xaa), Some(chain_id));
    session.set_timelocks(vec![TimelockContract {
        id: 7,
        remark: "Treasury".into(),
        chain_id: 1,
        contract_address: TIMELOCK.parse().unwrap(),
    }]);
    session
}

fn filled_form(operation: TimelockOperation) -> TransactionForm {
    let mut form = TransactionForm::new();
    form.select_timelock(Some(7));
    form.select_method(operation.signature());
    form.set_target(TARGET);
    form.set_value("1000");
    form.set_eta(Some(1_735_826_400));
    form.select_abi(Some(1));
    form.select_function("approve(address,uint256)");
    form.set_argument(0, SPENDER);
    form.set_argument(1, "500");
    form
}

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<TransactionPayload>>,
    error: Option<String>,
}

#[async_trait]
impl TransactionSender for RecordingSender {
    async fn send_transaction(&self, payload: &TransactionPayload) -> anyhow::Result<TxHash> {
        if let Some(message) = &self.error {
            anyhow::bail!("{message}");
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(TxHash::repeat_byte(0x01))
    }
}

#[test]
fn test_abi_change_resets_downstream_state() {
    let library = library();
    let mut form = filled_form(TimelockOperation::Queue);
    assert!(form.target_calldata(&library).success);

    form.select_abi(Some(2));
    assert_eq!(form.function_value(), "");
    assert!(form.argument_values().is_empty());
    assert!(!form.target_calldata(&library).success);
    // upstream selections survive
    assert_eq!(form.target(), TARGET);
    assert_eq!(form.timelock_id(), Some(7));
}

#[test]
fn test_function_change_resets_arguments_only() {
    let library = library();
    let mut form = filled_form(TimelockOperation::Queue);

    form.select_function("pause()");
    assert_eq!(form.abi_id(), Some(1));
    assert!(form.argument_values().is_empty());
    assert!(form.argument_params(&library).is_empty());

    // zero-parameter functions encode to empty data
    let encoded = form.target_calldata(&library);
    assert_eq!(encoded.data(), Some("0x"));
    assert!(form.timelock_calldata(&library).success);
}

#[test]
fn test_argument_params_follow_selected_function() {
    let library = library();
    let form = filled_form(TimelockOperation::Queue);
    let names: Vec<String> = form
        .argument_params(&library)
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["spender", "amount"]);
}

#[test]
fn test_preview_block() {
    let library = library();
    let session = connected_session(1);
    let form = filled_form(TimelockOperation::Queue);

    let preview = form.preview(&session, &library);
    let calldata = form.timelock_calldata(&library);
    let lines: Vec<String> = preview.to_string().lines().map(str::to_string).collect();

    assert_eq!(lines[0], format!("from:     {}", Address::repeat_byte(0xaa).to_checksum(None)));
    assert_eq!(lines[1], format!("to:       {TIMELOCK}"));
    // queue does not move funds
    assert_eq!(lines[2], "value:    0");
    assert_eq!(lines[3], format!("calldata: {}", calldata.encoded_data));
}

#[test]
fn test_timelock_calldata_carries_form_values() {
    let library = library();
    let form = filled_form(TimelockOperation::Queue);

    let calldata = form.timelock_calldata(&library);
    let decoded = decode_timelock_call(calldata.data().expect("generated")).expect("decodes");

    assert_eq!(decoded.call.operation, TimelockOperation::Queue);
    assert_eq!(decoded.call.target, TARGET.parse::<Address>().unwrap());
    assert_eq!(decoded.call.value, U256::from(1000));
    assert_eq!(decoded.call.signature, "approve(address,uint256)");
    assert_eq!(decoded.call.eta_secs(), Some(1_735_826_400));
    assert_eq!(decoded.inner.params()[1].value, "500");
}

#[test]
fn test_payload_value_only_for_execute() {
    let library = library();
    let session = connected_session(1);

    let queue = filled_form(TimelockOperation::Queue)
        .payload(&session, &library)
        .expect("queue payload");
    assert_eq!(queue.to_address, TIMELOCK.parse::<Address>().unwrap());
    assert_eq!(queue.value, U256::ZERO);
    assert_eq!(&queue.calldata[..4], &TimelockOperation::Queue.selector());

    let execute = filled_form(TimelockOperation::Execute)
        .payload(&session, &library)
        .expect("execute payload");
    assert_eq!(execute.value, U256::from(1000));
}

#[test]
fn test_payload_validation() {
    let library = library();
    let form = filled_form(TimelockOperation::Queue);

    assert_eq!(
        form.payload(&Session::new(), &library),
        Err(SubmitError::WalletNotConnected)
    );

    let mut no_chain = connected_session(1);
    no_chain.connect(Address::repeat_byte(0xaa), None);
    assert_eq!(form.payload(&no_chain, &library), Err(SubmitError::NetworkNotSelected));

    // wallet moved to another network after connecting
    let mut switched = connected_session(1);
    switched.switch_chain(10);
    assert_eq!(
        form.payload(&switched, &library),
        Err(SubmitError::WrongChain { expected: 1, actual: 10 })
    );

    let mut incomplete = TransactionForm::new();
    incomplete.select_method(TimelockOperation::Queue.signature());
    assert_eq!(
        incomplete.payload(&connected_session(1), &library),
        Err(SubmitError::MissingFields(vec!["timelock", "target", "function", "eta"]))
    );

    let mut missing_arg = filled_form(TimelockOperation::Queue);
    missing_arg.set_argument(1, "");
    assert_eq!(
        missing_arg.payload(&connected_session(1), &library),
        Err(SubmitError::CalldataNotGenerated)
    );
}

#[test]
fn test_payload_rejects_invalid_fields() {
    let library = library();
    let session = connected_session(1);

    // the coder would take hex, the value field only takes decimal wei
    let mut hex_value = filled_form(TimelockOperation::Execute);
    hex_value.set_value("0x10");
    assert!(hex_value.encode_timelock(&library).is_ok());
    assert_eq!(
        hex_value.payload(&session, &library),
        Err(SubmitError::InvalidField { field: "value", error: FieldError::NotANumber })
    );

    let mut short_target = filled_form(TimelockOperation::Queue);
    short_target.set_target("0x1234");
    assert_eq!(
        short_target.payload(&session, &library),
        Err(SubmitError::InvalidField { field: "target", error: FieldError::WrongLength })
    );
    assert_eq!(
        short_target.payload(&session, &library).unwrap_err().to_string(),
        "Invalid target: Address must be 42 characters"
    );
}

#[tokio::test]
async fn test_submit_hands_payload_to_wallet() {
    let library = library();
    let session = connected_session(1);
    let form = filled_form(TimelockOperation::Execute);
    let sender = RecordingSender::default();

    let hash = form.submit(&session, &library, &sender).await.expect("sent");
    assert_eq!(hash, TxHash::repeat_byte(0x01));

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], form.payload(&session, &library).unwrap());
}

#[tokio::test]
async fn test_submit_maps_wallet_errors() {
    let library = library();
    let session = connected_session(1);
    let form = filled_form(TimelockOperation::Queue);

    let rejecting = RecordingSender {
        error: Some("User rejected the request".into()),
        ..Default::default()
    };
    assert_eq!(
        form.submit(&session, &library, &rejecting).await,
        Err(SubmitError::Rejected)
    );

    let failing = RecordingSender {
        error: Some("nonce too low".into()),
        ..Default::default()
    };
    assert_eq!(
        form.submit(&session, &library, &failing).await,
        Err(SubmitError::Failed("nonce too low".into()))
    );

    // validation errors never reach the wallet
    let idle = RecordingSender::default();
    assert_eq!(
        form.submit(&Session::new(), &library, &idle).await,
        Err(SubmitError::WalletNotConnected)
    );
    assert!(idle.sent.lock().unwrap().is_empty());
}

#[test]
fn test_queued_transaction_follow_up_calls() {
    let library = library();
    let form = filled_form(TimelockOperation::Queue);
    let queued_calldata = form.encode_timelock(&library).expect("queue calldata");
    let decoded = decode_timelock_call(&hex::encode(&queued_calldata)).expect("decodes");

    let queued = QueuedTransaction::from_call(1, TIMELOCK.parse().unwrap(), &decoded.call)
        .expect("record");

    // executing the record replays the tuple the form would send
    let execute = queued.execute_payload().expect("execute payload");
    let from_form = filled_form(TimelockOperation::Execute)
        .payload(&connected_session(1), &library)
        .expect("execute payload");
    assert_eq!(execute, from_form);

    let cancel = queued.cancel_payload().expect("cancel payload");
    assert_eq!(cancel.value, U256::ZERO);
    assert_eq!(&cancel.calldata[4..], &execute.calldata[4..]);
}

#[test]
fn test_eta_entered_locally_round_trips() {
    let library = library();
    for hours in [-8, 0, 5, 9] {
        let tz = FixedOffset::east_opt(hours * 3600).unwrap();
        let local = tz.with_ymd_and_hms(2025, 1, 2, 14, 0, 0).unwrap();
        let input = local.format("%Y-%m-%dT%H:%M").to_string();

        let eta = eta_from_local(&input, &tz).expect("parses");
        assert_eq!(eta, local.timestamp() as u64);
        assert_eq!(eta_to_local(eta, &tz), Some(input));

        let mut form = filled_form(TimelockOperation::Queue);
        form.set_eta(Some(eta));
        let calldata = form.timelock_calldata(&library);
        let decoded = decode_timelock_call(calldata.data().unwrap()).unwrap();
        assert_eq!(decoded.call.eta_secs(), Some(eta));
    }
}

#[test]
fn test_scanned_library_feeds_the_form() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("Token.json"), TOKEN_ABI).expect("write ABI");

    let library = AbiScanner::scan(dir.path());
    let record = library.find_by_name("Token").expect("Token scanned");
    let options: Vec<String> = record.function_options().into_iter().map(|o| o.value).collect();
    assert_eq!(options, vec!["approve(address,uint256)", "pause()"]);

    let mut form = TransactionForm::new();
    form.select_abi(Some(record.id));
    form.select_function(options[0].clone());
    form.set_argument(0, SPENDER);
    form.set_argument(1, "1");
    assert!(form.target_calldata(&library).success);
}
