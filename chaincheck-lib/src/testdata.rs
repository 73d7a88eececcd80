//! Shared certificate fixtures for unit tests.
//!
//! Three RSA certificates generated for test use only:
//! - a self-signed CA (CN=tsumiki.test, CA:TRUE, valid 2025-12-28 to
//!   2035-12-26)
//! - an end-entity certificate (CN=server.tsumiki.test, SAN
//!   tsumiki.test / *.tsumiki.test / IP 127.0.0.1, same validity
//!   window). Its subject and issuer DNs are equal, but it is not
//!   signed by its own key, and not signed by the CA either.
//! - a self-signed certificate (CN=revocable.tsumiki.test, valid
//!   2026-08-29 to 2036-08-26) carrying a CRL distribution point and
//!   an OCSP responder URL, both pointing at the dead endpoint
//!   127.0.0.1:1, for revocation fail-closed tests.

use x509_parser::pem::Pem;

pub(crate) const CA_PEM: &str = r"-----BEGIN CERTIFICATE-----
MIIFxDCCA6ygAwIBAgIJAJOR1eonIkS9MA0GCSqGSIb3DQEBCwUAMG8xCzAJBgNV
BAYTAkpQMQ4wDAYDVQQIDAVUb2t5bzEQMA4GA1UEBwwHU2hpYnV5YTEYMBYGA1UE
CgwPVHN1bWlraSBQcm9qZWN0MQ0wCwYDVQQLDARUZXN0MRUwEwYDVQQDDAx0c3Vt
aWtpLnRlc3QwHhcNMjUxMjI4MDg0OTA3WhcNMzUxMjI2MDg0OTA3WjBvMQswCQYD
VQQGEwJKUDEOMAwGA1UECAwFVG9reW8xEDAOBgNVBAcMB1NoaWJ1eWExGDAWBgNV
BAoMD1RzdW1pa2kgUHJvamVjdDENMAsGA1UECwwEVGVzdDEVMBMGA1UEAwwMdHN1
bWlraS50ZXN0MIICIjANBgkqhkiG9w0BAQEFAAOCAg8AMIICCgKCAgEA4Ey4xmrV
Oju/hD/gGWzIG7PHAIKrCIyZdGNuESZxZCTISFYDLBif9SpIh1Ss1p5L37KCe7P8
6T2Ab/NPCpCUuHI51XOLBfvyAYPlkbF3bgtrtG4+4cCqpBTsQpE23tLjq3Yiw1Tp
uw8ny+83omq7sJJ3fYaDun/JDwK+sDhOxAfF7B0g8n6crg4cONXwBEVXcPNIr+SG
enwUAZwcCGG50tGiDGf92Mj/GuwbHrcaRsGbSClK/YismkO/dROCVhp+4tSCmGLM
eoKa7z+bkCyVNfCNJYXfJp1Iqpu65ElT0DzHq/KTvkbfFnkqSXb0e61CW/tSfFCK
vA0Ih6tlEa275rv86hEH5NZvM5kS66LUzZwgA2Cc527Xnf41zEPQZZhBe9VtReqR
sbBd02vScg4rsGy8j01T8mK/1yTD8euXJN7fuiuChhFMw/LWcGfwMsd3vG7ty4hh
Yuv7kYAcasZpABbT/2SvdJ8VX9pZLQiFJvUJ/tQGX0Mm3FZaExj/vttsO2/Q9/OP
hIAyPUWqgqw14SqjrBa9eUULKENiWpbf5EtXNeDWOGTUz8xLXL4AKYvbkLi0ciPp
GiN5U9/P05PgzakwsniCMuG+RtgYX0jJJNwzAsDMqk8C7ATWWj1UOCowADqOsTXS
oDnrwNkBv0AKN4oL1wh+Lyqc+8Idin2sA6sCAwEAAaNjMGEwHQYDVR0OBBYEFAHB
rLF5p+pxNqZDYFTpIpgzkOkIMB8GA1UdIwQYMBaAFAHBrLF5p+pxNqZDYFTpIpgz
kOkIMA8GA1UdEwEB/wQFMAMBAf8wDgYDVR0PAQH/BAQDAgGGMA0GCSqGSIb3DQEB
CwUAA4ICAQBc9G5hR7REaXkwnUs6gxGAqsrs2FLskDWUmQ7CqZChvmIcYDYaWBkN
dORbNnt5IayJaeGRtGVobLzKa5gkd7H8S2nYEf3ZB53Ao7axc6+qkXsyqw53GrkL
y9gRNtcmE2S1DAHLvNP2ITr+Q5xeilGrN5LX6cgvPLq7W9oUrejilCUdaxMD9JxU
H4UPitrCoenz6kmATYjFccgucpDrII6TKnAMBNa1MsRfyMxrK9eKWDVrCVaU8qG/
cc/lW+81HF9a58jLvLVNzkBU1akyuEkIySpjUAB17MqZED/E1vjnuz2uZ1ZdqvXn
v5IknYv37rFFa9umzLrPBg+bdAq6kSYO6fuZ1ALLXnXwS/o6aB6er3IhQ+BG3T2l
csJ9HHkSzd9+OQBxmvzQzqzPnrRUPPsVWFpY5U/HgiapQY7ap2WvH5PYqTTVJxuX
nRY+7m26TseaQUoGtvmGQroWExHXnfMPegXFMLMQNZ6sLd3196b7xXbsDLPWHI+W
iVmR86a6BiAiLoWky6r4X7hzOvEKEpP+U0AmzCy/M5QIJrQ8WUAUMYwUvwA/PUwD
UbUqI1x5HAbH95tvCou+2CI27rSINgsQjFdx13Xc3+4xjHGvncqWQXCyQvcC4a33
dlxmWgRWrD79sttWdIihj33fPv+OezjPjVNXU5tSJsDpKudwXhcPzQ==
-----END CERTIFICATE-----";

pub(crate) const EE_PEM: &str = r"-----BEGIN CERTIFICATE-----
MIIDrDCCApSgAwIBAgIJAJe8Uwe3KSplMA0GCSqGSIb3DQEBCwUAMFUxCzAJBgNV
BAYTAkpQMQ4wDAYDVQQIDAVUb2t5bzEYMBYGA1UECgwPVHN1bWlraSBQcm9qZWN0
MRwwGgYDVQQDDBNzZXJ2ZXIudHN1bWlraS50ZXN0MB4XDTI1MTIyODA5NTQyNloX
DTM1MTIyNjA5NTQyNlowVTELMAkGA1UEBhMCSlAxDjAMBgNVBAgMBVRva3lvMRgw
FgYDVQQKDA9Uc3VtaWtpIFByb2plY3QxHDAaBgNVBAMME3NlcnZlci50c3VtaWtp
LnRlc3QwggEiMA0GCSqGSIb3DQEBAQUAA4IBDwAwggEKAoIBAQDtc3gArhY+2ZPa
EEodwZSdV64JfI6LP/VJdCrJkrWw+cAjIoPd5IWYYM4quJjyS0sKJdOcG1ox+Vyk
V2Mx3Tu7a9HfkL94UVC6wkuqxn6ss1nF3WDwRpMKdk2osAkfC2DEy+gUTbSUP7nF
xLfzWnHsiKf7OQdnvqi1+ky77c2oYCsR4Gmc45/pmma8laHtD15nLrNw6QPNFXgi
tqVRsJAd887FP35vsxlKLSt1KtDplXPwVdTKIEoAfC3rbfS2RtHoLz2iScS4m97R
H2yd71R04UaBluloV6eVn+SYx6toglm2TigxQG/v0i/b4J5+tTLRFWSbSw6IXfPv
IpeO5QybAgMBAAGjfzB9MB0GA1UdDgQWBBQ3BSW6F/y0r7M6za10RFuSkEjWADAO
BgNVHQ8BAf8EBAMCBaAwHQYDVR0lBBYwFAYIKwYBBQUHAwEGCCsGAQUFBwMCMC0G
A1UdEQQmMCSCDHRzdW1pa2kudGVzdIIOKi50c3VtaWtpLnRlc3SHBH8AAAEwDQYJ
KoZIhvcNAQELBQADggEBAK+YTpe3eg622ATN9mXMUxyD+qHLdsjqaoe1XHyjZyZ7
uEERNtSw2FBxzg1YDh2dEZtWc8ybwPwJwpySo/7dq53BWZW6aBW0kMp3GLC/Od6C
k+8EFoao7SFr16XsGQJD4DNoKVvHKAE2FworjXdRUFswwtkoD8gdsK2sf2vgnBv8
HAVm7HukOAHpl5Cv4uoD57p1kfMH4T7q1yKz5e9kQi3Ta5vJzydMluZzgJQUxif1
3nAQuaKAyIZfiF4QTlaA8i8nodjhZeM6A0ZomnZeCVjigqkr706tbakcyyrbsjM4
I36SjnCvZLfTAZy2PzjD+JS43m/+2ydsdhU7+aUoR+w=
-----END CERTIFICATE-----";

pub(crate) const REVOCABLE_PEM: &str = r"-----BEGIN CERTIFICATE-----
MIIEGTCCAwGgAwIBAgIUN1HDY7CRYiOYQSfLMf3bvQuzuoAwDQYJKoZIhvcNAQEL
BQAwWDELMAkGA1UEBhMCSlAxDjAMBgNVBAgMBVRva3lvMRgwFgYDVQQKDA9Uc3Vt
aWtpIFByb2plY3QxHzAdBgNVBAMMFnJldm9jYWJsZS50c3VtaWtpLnRlc3QwHhcN
MjYwODI5MDcxMDE1WhcNMzYwODI2MDcxMDE1WjBYMQswCQYDVQQGEwJKUDEOMAwG
A1UECAwFVG9reW8xGDAWBgNVBAoMD1RzdW1pa2kgUHJvamVjdDEfMB0GA1UEAwwW
cmV2b2NhYmxlLnRzdW1pa2kudGVzdDCCASIwDQYJKoZIhvcNAQEBBQADggEPADCC
AQoCggEBAKHiy84Is4A2YJHXgNLe5xviYao2+9JNEIT8zniqSBlJjtnqkcbtjq5c
fkw3qVtKRyjxLWxXOeEgvjyigUlubIY/3jSAMzQSpuFoSfviajsyTv7JrZ0kW91G
jwOIurCvV5qlhyM+JBuXaufO+j88TR+prE0hm+opfa47ltSpmKWG9dzhLYgl0wfw
s+FXkaNXXRYFp8m+Acd7V/M1YCTsRuO1BM6Jm+kSyhazAxK8WxbDfN78DP0q8Wun
gEhl+/co4L0YkOGoVNhMqVwpuQPxwzgRDfjjgWwvzF/8FFt2DmkJ8m4r7Rxznaes
EDgeQnErE09MUi/alTG5nMNOoZfnvhECAwEAAaOB2jCB1zAdBgNVHQ4EFgQUEW5d
Erzs9HkyJVDRF6pZu1jIY1UwHwYDVR0jBBgwFoAUEW5dErzs9HkyJVDRF6pZu1jI
Y1UwDAYDVR0TAQH/BAIwADAhBgNVHREEGjAYghZyZXZvY2FibGUudHN1bWlraS50
ZXN0MC8GA1UdHwQoMCYwJKAioCCGHmh0dHA6Ly8xMjcuMC4wLjE6MS90c3VtaWtp
LmNybDAzBggrBgEFBQcBAQQnMCUwIwYIKwYBBQUHMAGGF2h0dHA6Ly8xMjcuMC4w
LjE6MS9vY3NwMA0GCSqGSIb3DQEBCwUAA4IBAQAYQ7BM4sLfCdaCGUn2AGdDw+q6
vWUZ1sin2CFg2AF8OgwyOkno6rcCPCbOlGqnNaMlpBRF2AVYNEmPUk5nfilZrWN6
EeLmRTNZnnR/W6jqGwOWoqlO41EOMr2xT5C1ptN4+JAXUsQ6OQxP6Z/ee90+0UZV
SPriOnGMCdLR+uezoLgOkM8esp1RUP89P6d1FX3Mdem0ESAVQWlKL0QhHZbyYd2p
i5nq3UPR6ICe12kgUlW/ywIxjyeBDjINLKbpl5R1gk9atl1c6cybmCJbRtGA+8/h
4wxA+D11CTuOuiX7xRmC+uVYZG/4jfhlo4UBIqT34K5IwJQKr3zP0BAUEQav
-----END CERTIFICATE-----";

/// Unix timestamp inside both certificates' validity windows (2027).
pub(crate) const AT_VALID: i64 = 1_800_000_000;
/// Unix timestamp before both notBefore dates (2020).
pub(crate) const AT_TOO_EARLY: i64 = 1_600_000_000;
/// Unix timestamp past both notAfter dates (2042).
pub(crate) const AT_TOO_LATE: i64 = 2_300_000_000;

fn pem_to_der(pem: &str) -> Vec<u8> {
    let parsed = Pem::iter_from_buffer(pem.as_bytes())
        .next()
        .expect("fixture has one PEM block")
        .expect("fixture PEM parses");
    parsed.contents
}

pub(crate) fn ca_der() -> Vec<u8> {
    pem_to_der(CA_PEM)
}

pub(crate) fn ee_der() -> Vec<u8> {
    pem_to_der(EE_PEM)
}

pub(crate) fn revocable_der() -> Vec<u8> {
    pem_to_der(REVOCABLE_PEM)
}
