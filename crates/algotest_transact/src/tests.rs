use crate::{
    constants::{MAX_TX_GROUP_SIZE, SIGNATURE_BYTE_LENGTH, SIGNATURE_ENCODING_INCR},
    test_utils::{
        AccountMother, TransactionGroupMother, TransactionHeaderMother, TransactionMother,
    },
    AlgorandMsgpack, EstimateTransactionSize, SignedTransaction, Transaction, TransactionId,
    Transactions,
};
use base64::{prelude::BASE64_STANDARD, Engine};
use pretty_assertions::assert_eq;

#[test]
fn test_payment_transaction_encoding() {
    let tx_builder = TransactionMother::simple_payment();
    let payment_tx_fields = tx_builder.build_fields().unwrap();
    let payment_tx = tx_builder.build().unwrap();

    let encoded = payment_tx.encode().unwrap();
    let decoded = Transaction::decode(&encoded).unwrap();
    assert_eq!(decoded, payment_tx);
    assert_eq!(decoded, Transaction::Payment(payment_tx_fields));

    let signed_tx = SignedTransaction::from_signature(
        payment_tx.clone(),
        [0; SIGNATURE_BYTE_LENGTH],
    );
    let encoded_stx = signed_tx.encode().unwrap();
    let decoded_stx = SignedTransaction::decode(&encoded_stx).unwrap();
    assert_eq!(decoded_stx, signed_tx);
    assert_eq!(decoded_stx.transaction, payment_tx);

    let raw_encoded = payment_tx.encode_raw().unwrap();
    assert_eq!(encoded[0], b'T');
    assert_eq!(encoded[1], b'X');
    assert_eq!(encoded.len(), raw_encoded.len() + 2);
    assert_eq!(encoded[2..], raw_encoded);
}

#[test]
fn test_pay_transaction_id() {
    let expected_tx_id_raw = [
        35, 93, 0, 170, 96, 221, 1, 74, 119, 147, 131, 116, 7, 31, 225, 40, 215, 47, 44, 120,
        128, 245, 41, 65, 116, 255, 147, 64, 90, 80, 147, 223,
    ];
    let expected_tx_id = "ENOQBKTA3UAUU54TQN2AOH7BFDLS6LDYQD2SSQLU76JUAWSQSPPQ";

    let payment_tx = TransactionMother::payment_with_note().build().unwrap();
    let signed_tx = SignedTransaction::from_signature(
        payment_tx.clone(),
        [0; SIGNATURE_BYTE_LENGTH],
    );

    assert_eq!(payment_tx.id().unwrap(), expected_tx_id);
    assert_eq!(payment_tx.id_raw().unwrap(), expected_tx_id_raw);
    assert_eq!(signed_tx.id().unwrap(), expected_tx_id);
    assert_eq!(signed_tx.id_raw().unwrap(), expected_tx_id_raw);
}

#[test]
fn test_estimate_transaction_size() {
    let payment_tx = TransactionMother::simple_payment().build().unwrap();
    let encoding_length = payment_tx.encode_raw().unwrap().len();
    let estimation = payment_tx.estimate_size().unwrap();

    let signed_tx = SignedTransaction::from_signature(
        payment_tx.clone(),
        [0; SIGNATURE_BYTE_LENGTH],
    );
    let actual_size = signed_tx.encode().unwrap().len();

    assert_eq!(estimation, encoding_length + SIGNATURE_ENCODING_INCR);
    assert_eq!(estimation, actual_size);
}

#[test]
fn test_asset_transfer_round_trip() {
    let tx_builder = TransactionMother::simple_asset_transfer();
    let asset_transfer_tx = tx_builder.build().unwrap();

    let encoded = asset_transfer_tx.encode().unwrap();
    let decoded = Transaction::decode(&encoded).unwrap();
    assert_eq!(decoded, asset_transfer_tx);
}

#[test]
fn test_application_call_round_trip() {
    let app_create_tx = TransactionMother::app_create().build().unwrap();

    let encoded = app_create_tx.encode().unwrap();
    let decoded = Transaction::decode(&encoded).unwrap();
    assert_eq!(decoded, app_create_tx);
}

#[test]
fn test_asset_create_round_trip() {
    let asset_create_tx = TransactionMother::asset_create().build().unwrap();

    let encoded = asset_create_tx.encode().unwrap();
    let decoded = Transaction::decode(&encoded).unwrap();
    assert_eq!(decoded, asset_create_tx);
}

#[test]
fn test_multi_transaction_group() {
    let expected_group: [u8; 32] = BASE64_STANDARD
        .decode(String::from("uJA6BWzZ5g7Ve0FersqCLWsrEstt6p0+F3bNGEKH3I4="))
        .unwrap()
        .try_into()
        .unwrap();
    let txs = TransactionGroupMother::testnet_payment_group();

    let grouped_txs = txs.as_slice().assign_group().unwrap();

    assert_eq!(grouped_txs.len(), txs.len());
    for grouped_tx in grouped_txs.iter() {
        assert_eq!(grouped_tx.header().group.unwrap(), expected_group);
    }
    assert_eq!(
        &grouped_txs[0].id().unwrap(),
        "6SIXGV2TELA2M5RHZ72CVKLBSJ2OPUAKYFTUUE27O23RN6TFMGHQ"
    );
    assert_eq!(
        &grouped_txs[1].id().unwrap(),
        "7OY3VQXJCDSKPMGEFJMNJL2L3XIOMRM2U7DM2L54CC7QM5YBFQEA"
    );
}

#[test]
fn test_group_id_is_deterministic() {
    let txs = TransactionGroupMother::testnet_payment_group();

    let first = crate::compute_group(&txs).unwrap();
    let second = crate::compute_group(&txs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_group_id_depends_on_order() {
    let txs = TransactionGroupMother::testnet_payment_group();
    let mut reordered = txs.clone();
    reordered.reverse();

    let forward = crate::compute_group(&txs).unwrap();
    let backward = crate::compute_group(&reordered).unwrap();
    assert_ne!(forward, backward);
}

#[test]
fn test_group_id_depends_on_content() {
    let txs = TransactionGroupMother::group_of(2);
    let mut altered = txs.clone();
    altered[1].header_mut().note = Some(b"different".to_vec());

    let original = crate::compute_group(&txs).unwrap();
    let changed = crate::compute_group(&altered).unwrap();
    assert_ne!(original, changed);
}

#[test]
fn test_transaction_group_too_big() {
    let txs: Vec<Transaction> = TransactionGroupMother::group_of(MAX_TX_GROUP_SIZE + 1);

    let error = txs.assign_group().unwrap_err();
    assert!(error
        .to_string()
        .starts_with("Transaction group size exceeds the max limit"));
}

#[test]
fn test_transaction_group_too_small() {
    let txs: Vec<Transaction> = TransactionGroupMother::group_of(0);

    let error = txs.assign_group().unwrap_err();
    assert!(error
        .to_string()
        .starts_with("Transaction group size cannot be 0"));
}

#[test]
fn test_transaction_group_already_set() {
    let tx: Transaction = TransactionMother::simple_payment()
        .header(
            TransactionHeaderMother::simple_testnet()
                .group(
                    BASE64_STANDARD
                        .decode(String::from("y1Hz6KZhHJI4TZLwZqXO3TFgXVQdD/1+c6BLk3wTW6Q="))
                        .unwrap()
                        .try_into()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .to_owned()
        .build()
        .unwrap();

    let error = vec![tx].assign_group().unwrap_err();
    assert!(error
        .to_string()
        .starts_with("Transactions must not already be grouped"));
}

#[test]
fn test_multisig_signed_transaction_round_trip() {
    let payment_tx = TransactionMother::simple_payment().build().unwrap();
    let mut msig = AccountMother::msig();
    msig.apply_subsignature(
        &AccountMother::account().address(),
        [3; SIGNATURE_BYTE_LENGTH],
    )
    .unwrap();

    let signed_tx = SignedTransaction::from_multisignature(payment_tx, msig);
    let encoded = signed_tx.encode().unwrap();
    let decoded = SignedTransaction::decode(&encoded).unwrap();
    assert_eq!(decoded, signed_tx);
}

#[test]
fn test_logic_signed_transaction_round_trip() {
    let payment_tx = TransactionMother::simple_payment().build().unwrap();
    let lsig = crate::LogicSignature::new(vec![0x06, 0x81, 0x01]);

    let signed_tx = SignedTransaction::from_logic_signature(payment_tx, lsig);
    let encoded = signed_tx.encode().unwrap();
    let decoded = SignedTransaction::decode(&encoded).unwrap();
    assert_eq!(decoded, signed_tx);
}
