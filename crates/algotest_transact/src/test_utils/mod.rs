//! Object mothers for tests: well-known accounts, headers, transactions,
//! and transaction groups, several of them mirroring real confirmed
//! transactions so ids and group digests can be pinned exactly.

use crate::{
    transactions::{AssetTransferTransactionBuilder, PaymentTransactionBuilder},
    ApplicationCallTransactionBuilder, AssetParamsBuilder, KeyPairAccount, MultisigSignature,
    StateSchema, Transaction, TransactionHeaderBuilder, PUBLIC_KEY_BYTE_LENGTH,
};
use base64::{prelude::BASE64_STANDARD, Engine};

pub struct TransactionHeaderMother {}
impl TransactionHeaderMother {
    pub fn testnet() -> TransactionHeaderBuilder {
        TransactionHeaderBuilder::default()
            .genesis_id(String::from("testnet-v1.0"))
            .genesis_hash(
                BASE64_STANDARD
                    .decode("SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=")
                    .unwrap()
                    .try_into()
                    .unwrap(),
            )
            .fee(1000)
            .to_owned()
    }

    pub fn simple_testnet() -> TransactionHeaderBuilder {
        Self::testnet()
            .sender(AccountMother::account().address())
            .first_valid(50659540)
            .last_valid(50660540)
            .to_owned()
    }

    pub fn example() -> TransactionHeaderBuilder {
        TransactionHeaderBuilder::default()
            .genesis_id(String::from("example"))
            .genesis_hash(
                BASE64_STANDARD
                    .decode("3r2+nRwL99aTROTiOtPEeUQarv2fATkmNliHqfGxNJA=")
                    .unwrap()
                    .try_into()
                    .unwrap(),
            )
            .first_valid(1)
            .last_valid(999)
            .fee(1000)
            .sender(AccountMother::example().address())
            .to_owned()
    }
}

pub struct TransactionMother {}
impl TransactionMother {
    pub fn simple_payment() -> PaymentTransactionBuilder {
        PaymentTransactionBuilder::default()
            .header(TransactionHeaderMother::simple_testnet().build().unwrap())
            .amount(101000)
            .receiver(
                "VXH5UP6JLU2CGIYPUFZ4Z5OTLJCLMA5EXD3YHTMVNDE5P7ILZ324FSYSPQ"
                    .parse()
                    .unwrap(),
            )
            .to_owned()
    }

    pub fn payment_with_note() -> PaymentTransactionBuilder {
        Self::simple_payment()
            .header(
                TransactionHeaderMother::simple_testnet()
                    .note(
                        BASE64_STANDARD
                            .decode("MGFhNTBkMjctYjhmNy00ZDc3LWExZmItNTUxZmQ1NWRmMmJj")
                            .unwrap(),
                    )
                    .to_owned()
                    .build()
                    .unwrap(),
            )
            .to_owned()
    }

    pub fn simple_asset_transfer() -> AssetTransferTransactionBuilder {
        AssetTransferTransactionBuilder::default()
            .header(
                TransactionHeaderMother::simple_testnet()
                    .sender(AccountMother::neil().address())
                    .first_valid(51183672)
                    .last_valid(51183872)
                    .build()
                    .unwrap(),
            )
            .asset_id(107686045)
            .amount(1000)
            .receiver(AccountMother::account().address())
            .to_owned()
    }

    pub fn opt_in_asset_transfer() -> AssetTransferTransactionBuilder {
        Self::simple_asset_transfer()
            .amount(0)
            .receiver(AccountMother::neil().address())
            .to_owned()
    }

    pub fn asset_create() -> crate::AssetConfigTransactionBuilder {
        crate::AssetConfigTransactionBuilder::default()
            .header(TransactionHeaderMother::example().build().unwrap())
            .params(
                AssetParamsBuilder::default()
                    .total(1_000_000)
                    .decimals(2)
                    .unit_name("TST".to_string())
                    .asset_name("Test Token".to_string())
                    .manager(AccountMother::example().address())
                    .build()
                    .unwrap(),
            )
            .to_owned()
    }

    pub fn app_create() -> ApplicationCallTransactionBuilder {
        ApplicationCallTransactionBuilder::default()
            .header(TransactionHeaderMother::example().build().unwrap())
            .approval_program(vec![0x06, 0x81, 0x01])
            .clear_state_program(vec![0x06, 0x81, 0x01])
            .global_schema(StateSchema::new(1, 1))
            .to_owned()
    }
}

pub struct AccountMother {}
impl AccountMother {
    pub fn zero_address_account() -> KeyPairAccount {
        KeyPairAccount::from_pubkey(&[0; PUBLIC_KEY_BYTE_LENGTH])
    }

    pub fn account() -> KeyPairAccount {
        "RIMARGKZU46OZ77OLPDHHPUJ7YBSHRTCYMQUC64KZCCMESQAFQMYU6SL2Q"
            .parse()
            .unwrap()
    }

    pub fn neil() -> KeyPairAccount {
        "JB3K6HTAXODO4THESLNYTSG6GQUFNEVIQG7A6ZYVDACR6WA3ZF52TKU5NA"
            .parse()
            .unwrap()
    }

    pub fn example() -> KeyPairAccount {
        "ALGOC4J2BCZ33TCKSSAMV5GAXQBMV3HDCHDBSPRBZRNSR7BM2FFDZRFGXA"
            .parse()
            .unwrap()
    }

    pub fn msig() -> MultisigSignature {
        MultisigSignature::from_participants(
            1,
            2,
            vec![Self::account().into(), Self::example().into()],
        )
        .unwrap()
    }
}

pub struct TransactionGroupMother {}
impl TransactionGroupMother {
    /// A real TestNet group of two payment transactions.
    pub fn testnet_payment_group() -> Vec<Transaction> {
        let header_builder = TransactionHeaderMother::testnet()
            .sender(AccountMother::neil().address())
            .first_valid(51532821)
            .last_valid(51533021)
            .to_owned();

        let pay_1 = PaymentTransactionBuilder::default()
            .header(
                header_builder
                    .clone()
                    .note(BASE64_STANDARD.decode("VGVzdCAx").unwrap())
                    .build()
                    .unwrap(),
            )
            .receiver(AccountMother::neil().address())
            .amount(1000000)
            .build()
            .unwrap();

        let pay_2 = PaymentTransactionBuilder::default()
            .header(
                header_builder
                    .clone()
                    .note(BASE64_STANDARD.decode("VGVzdCAy").unwrap())
                    .build()
                    .unwrap(),
            )
            .receiver(AccountMother::neil().address())
            .amount(200000)
            .build()
            .unwrap();

        vec![pay_1, pay_2]
    }

    pub fn group_of(number_of_transactions: usize) -> Vec<Transaction> {
        let header_builder = TransactionHeaderMother::testnet()
            .sender(AccountMother::neil().address())
            .first_valid(51532821)
            .last_valid(51533021)
            .to_owned();

        let mut txs = vec![];
        for i in 0..number_of_transactions {
            let tx: Transaction = PaymentTransactionBuilder::default()
                .header(
                    header_builder
                        .clone()
                        .note(format!("tx:{}", i).as_bytes().to_vec())
                        .build()
                        .unwrap(),
                )
                .receiver(AccountMother::neil().address())
                .amount(200000)
                .build()
                .unwrap();
            txs.push(tx);
        }
        txs
    }
}
