//! PDF text extraction backed by `lopdf`.

use lopdf::Document;

use super::ExtractError;

/// Extract the text of every page, concatenated in page order.
///
/// No separator is inserted between pages; whatever line breaks the page
/// decoder emits are kept as-is.
///
/// # Errors
///
/// * [`ExtractError::Pdf`] — unparsable file or undecodable page.
/// * [`ExtractError::Encrypted`] — the document is encrypted and cannot be
///   opened with the empty user password (a real password is set, or the
///   scheme is not RC4 revision 2/3).
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    // Owner-locked files often have an empty user password; readers open them
    // without prompting.
    if doc.is_encrypted() {
        doc.decrypt("").map_err(|e| {
            log::debug!("pdf: empty user password rejected: {e}");
            ExtractError::Encrypted
        })?;
        log::debug!("pdf: decrypted with the empty user password");
    }

    let pages = doc.get_pages();
    log::debug!("pdf: {} page(s)", pages.len());

    let mut text = String::new();
    // BTreeMap keys iterate in ascending page number.
    for page_number in pages.keys() {
        let page_text = doc
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::Pdf(format!("page {page_number}: {e}")))?;
        text.push_str(&page_text);
    }

    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one page per entry of `pages`, each showing its text.
    pub(crate) fn make_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn pages_are_concatenated_in_order() {
        let bytes = make_pdf(&["Alpha page", "Beta page", "Gamma page"]);
        let text = extract_pdf(&bytes).unwrap();

        let a = text.find("Alpha").expect("first page text");
        let b = text.find("Beta").expect("second page text");
        let c = text.find("Gamma").expect("third page text");
        assert!(a < b && b < c, "pages out of order: {text:?}");
    }

    #[test]
    fn result_equals_per_page_concatenation() {
        let bytes = make_pdf(&["one", "two"]);
        let doc = Document::load_mem(&bytes).unwrap();
        let expected = format!(
            "{}{}",
            doc.extract_text(&[1]).unwrap(),
            doc.extract_text(&[2]).unwrap()
        );
        assert_eq!(extract_pdf(&bytes).unwrap(), expected);
    }

    /// RC4 keystream XOR, used to build encrypted fixtures.
    fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
        let mut state: Vec<u8> = (0..=255).collect();
        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }
        let (mut i, mut j) = (0u8, 0u8);
        data.iter()
            .map(|byte| {
                i = i.wrapping_add(1);
                j = j.wrapping_add(state[i as usize]);
                state.swap(i as usize, j as usize);
                let k = state[state[i as usize].wrapping_add(state[j as usize]) as usize];
                byte ^ k
            })
            .collect()
    }

    const PASSWORD_PAD: [u8; 32] = [
        0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
        0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
        0x69, 0x7A,
    ];

    /// Encrypt `plain` with the standard security handler (V1, R2, 40-bit
    /// RC4) and an empty user password. `wrong_check` replaces the `/U`
    /// entry with bytes that do not match the empty password.
    fn encrypt_pdf(plain: &[u8], wrong_check: bool) -> Vec<u8> {
        use lopdf::StringFormat;

        let mut doc = Document::load_mem(plain).unwrap();
        let file_id = b"0123456789abcdef".to_vec();
        doc.trailer.set(
            "ID",
            vec![
                Object::String(file_id.clone(), StringFormat::Hexadecimal),
                Object::String(file_id, StringFormat::Hexadecimal),
            ],
        );

        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "Length" => 40,
            "O" => Object::String(vec![0x5A; 32], StringFormat::Hexadecimal),
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);

        let key = lopdf::encryption::get_encryption_key(&doc, "", false).unwrap();
        let check = if wrong_check {
            vec![0u8; 32]
        } else {
            rc4(&key, &PASSWORD_PAD)
        };
        doc.get_object_mut(encrypt_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("U", Object::String(check, StringFormat::Hexadecimal));

        // RC4 is symmetric: "decrypting" a plaintext stream encrypts it.
        let stream_ids: Vec<_> = doc
            .objects
            .iter()
            .filter(|(_, obj)| matches!(obj, Object::Stream(_)))
            .map(|(id, _)| *id)
            .collect();
        for id in stream_ids {
            let obj = doc.objects.get_mut(&id).unwrap();
            let cipher = lopdf::encryption::decrypt_object(&key, id, &*obj).unwrap();
            if let Object::Stream(stream) = obj {
                stream.set_content(cipher);
            }
        }

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn empty_user_password_pdf_is_read() {
        let plain = make_pdf(&["Locked for editing", "but readable"]);
        let locked = encrypt_pdf(&plain, false);

        let locked_doc = Document::load_mem(&locked).unwrap();
        assert!(locked_doc.is_encrypted());
        assert!(!locked.windows(6).any(|w| w == b"Locked"));

        assert_eq!(extract_pdf(&locked).unwrap(), extract_pdf(&plain).unwrap());
    }

    #[test]
    fn pdf_needing_a_real_password_is_encrypted_error() {
        let locked = encrypt_pdf(&make_pdf(&["secret"]), true);
        assert!(matches!(extract_pdf(&locked), Err(ExtractError::Encrypted)));
    }

    #[test]
    fn unsupported_security_handler_is_encrypted_error() {
        let mut doc = Document::load_mem(&make_pdf(&["aes"])).unwrap();
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 5,
            "R" => 6,
        });
        doc.trailer.set("Encrypt", encrypt_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        assert!(matches!(extract_pdf(&bytes), Err(ExtractError::Encrypted)));
    }

    #[test]
    fn garbage_is_pdf_error() {
        let err = extract_pdf(b"%PDF-1.4 truncated").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
