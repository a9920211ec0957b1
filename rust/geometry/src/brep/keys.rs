// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena keys of the reference B-rep kernel.

use slotmap::new_key_type;

new_key_type! {
    /// Key for an edge (one curve shared by up to two faces).
    pub struct EdgeKey;

    /// Key for a face (surface bounded by edge loops).
    pub struct FaceKey;
}
