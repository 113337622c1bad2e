#![allow(dead_code)]

use bitcoin::bip32::{Xpriv, Xpub};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::Network;
use bux_admin::{TransportHttp, TransportOptions};
use httpmock::MockServer;

pub fn admin_xpriv() -> Xpriv {
    Xpriv::new_master(Network::Bitcoin, &[1u8; 32]).unwrap()
}

pub fn user_xpriv() -> Xpriv {
    Xpriv::new_master(Network::Bitcoin, &[2u8; 32]).unwrap()
}

pub fn xpub_of(xpriv: &Xpriv) -> String {
    Xpub::from_priv(&Secp256k1::new(), xpriv).to_string()
}

pub fn options(server: &MockServer) -> TransportOptions {
    TransportOptions {
        server: server.url("/v1"),
        sign_request: true,
        ..Default::default()
    }
}

/// Transport holding only the admin key.
pub fn admin_transport(server: &MockServer) -> TransportHttp {
    TransportHttp::new(TransportOptions {
        admin_key: Some(admin_xpriv().to_string()),
        ..options(server)
    })
    .unwrap()
}

/// Transport holding only a user key, so every admin call must fail locally.
pub fn user_transport(server: &MockServer) -> TransportHttp {
    TransportHttp::new(TransportOptions {
        xpriv: Some(user_xpriv().to_string()),
        ..options(server)
    })
    .unwrap()
}
